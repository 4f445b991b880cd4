//! Effective federation configuration for a CLI run
//!
//! Layered lowest to highest: built-in defaults, the `--config` TOML file,
//! `COBIE_*` environment variables, then command-line flags.

use crate::error::Result;
use clap::Args;
use cobie_common::IndexingBase;
use cobie_federate::{FederationConfig, UnknownSheetPolicy};
use std::path::PathBuf;

/// Configuration flags shared by the commands that run a federation
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Federation config file (TOML)
    #[arg(long, env = "COBIE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Row numbering in reported errors: row_one or row_two
    #[arg(long, value_name = "BASE")]
    pub indexing_base: Option<IndexingBase>,

    /// Drop unregistered sheets instead of failing the run
    #[arg(long)]
    pub drop_unknown_sheets: bool,

    /// Column left out of row fingerprints (repeatable)
    #[arg(long = "exclude-column", value_name = "COLUMN")]
    pub exclude_columns: Vec<String>,
}

impl ConfigArgs {
    /// Resolve the configuration this run should use
    pub fn resolve(&self) -> Result<FederationConfig> {
        let mut config = match &self.config {
            Some(path) => FederationConfig::load(path)?,
            None => FederationConfig::default(),
        };
        config.merge_env()?;

        if let Some(base) = self.indexing_base {
            config.indexing_base = base;
        }
        if self.drop_unknown_sheets {
            config.unknown_sheets = UnknownSheetPolicy::Drop;
        }
        if !self.exclude_columns.is_empty() {
            config.excluded_columns = self.exclude_columns.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cobie.toml");
        std::fs::write(
            &path,
            "indexing_base = \"row_one\"\nexcluded_columns = [\"Description\"]\n",
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(path),
            drop_unknown_sheets: true,
            exclude_columns: vec!["Height".to_string()],
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.unknown_sheets, UnknownSheetPolicy::Drop);
        assert_eq!(config.excluded_columns, vec!["Height"]);
    }

    #[test]
    fn test_unknown_flag_column_is_rejected() {
        let args = ConfigArgs {
            exclude_columns: vec!["Colour".to_string()],
            ..Default::default()
        };
        assert!(matches!(args.resolve().unwrap_err(), CliError::Federation(_)));
    }
}
