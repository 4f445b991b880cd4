//! Federation run configuration
//!
//! Loaded from a TOML file, then overridden from `COBIE_*` environment
//! variables. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! indexing_base = "row_two"
//! unknown_sheets = "reject"
//! excluded_columns = ["Description"]
//! ```

use crate::schema::SheetKind;
use cobie_common::{CobieError, IndexingBase, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with a source sheet whose name is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSheetPolicy {
    /// Fail the run before any merge work
    #[default]
    Reject,
    /// Leave the sheet out of the result and log a warning
    Drop,
}

impl std::str::FromStr for UnknownSheetPolicy {
    type Err = CobieError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "fail" => Ok(UnknownSheetPolicy::Reject),
            "drop" | "skip" => Ok(UnknownSheetPolicy::Drop),
            _ => Err(CobieError::parse(format!(
                "Invalid unknown sheet policy: {} (expected reject or drop)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for UnknownSheetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownSheetPolicy::Reject => write!(f, "reject"),
            UnknownSheetPolicy::Drop => write!(f, "drop"),
        }
    }
}

/// Settings for one federation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FederationConfig {
    /// Numbering of row positions in reported errors
    pub indexing_base: IndexingBase,

    pub unknown_sheets: UnknownSheetPolicy,

    /// Columns left out of row fingerprints, on top of provenance columns
    pub excluded_columns: Vec<String>,
}

impl FederationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CobieError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| CobieError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CobieError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CobieError::config(e.to_string()))
    }

    /// Defaults overridden from the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    ///
    /// - `COBIE_INDEXING_BASE`: row_one, row_two
    /// - `COBIE_UNKNOWN_SHEETS`: reject, drop
    /// - `COBIE_EXCLUDED_COLUMNS`: comma-separated column names
    pub fn merge_env(&mut self) -> Result<()> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base) = var("COBIE_INDEXING_BASE") {
            self.indexing_base = base.parse()?;
        }
        if let Some(policy) = var("COBIE_UNKNOWN_SHEETS") {
            self.unknown_sheets = policy.parse()?;
        }
        if let Some(columns) = var("COBIE_EXCLUDED_COLUMNS") {
            self.excluded_columns = columns
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Reject configuration the federator could not honour
    ///
    /// Every excluded column must exist in at least one sheet schema; a typo
    /// would otherwise silently change nothing.
    pub fn validate(&self) -> Result<()> {
        for column in &self.excluded_columns {
            if column.trim().is_empty() {
                return Err(CobieError::config("excluded column name is empty"));
            }
            let known = SheetKind::ALL
                .iter()
                .any(|kind| kind.schema().column_index(column).is_some());
            if !known {
                return Err(CobieError::config(format!(
                    "excluded column '{}' does not appear in any sheet",
                    column
                )));
            }
        }
        Ok(())
    }

    pub fn with_indexing_base(mut self, base: IndexingBase) -> Self {
        self.indexing_base = base;
        self
    }

    pub fn with_unknown_sheets(mut self, policy: UnknownSheetPolicy) -> Self {
        self.unknown_sheets = policy;
        self
    }

    pub fn with_excluded_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = FederationConfig::new();
        assert_eq!(config.indexing_base, IndexingBase::RowTwo);
        assert_eq!(config.unknown_sheets, UnknownSheetPolicy::Reject);
        assert!(config.excluded_columns.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = FederationConfig::from_toml(
            r#"
            indexing_base = "row_one"
            unknown_sheets = "drop"
            excluded_columns = ["Description", "Phone"]
            "#,
        )
        .unwrap();
        assert_eq!(config.indexing_base, IndexingBase::RowOne);
        assert_eq!(config.unknown_sheets, UnknownSheetPolicy::Drop);
        assert_eq!(config.excluded_columns, vec!["Description", "Phone"]);

        assert_eq!(FederationConfig::from_toml("").unwrap(), FederationConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = FederationConfig::from_toml("indexing_base = \"row_three\"").unwrap_err();
        assert!(matches!(err, CobieError::Config(_)));

        let err = FederationConfig::from_toml("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, CobieError::Config(_)));
    }

    #[test]
    fn test_unknown_excluded_column_is_rejected() {
        let err = FederationConfig::new()
            .with_excluded_columns(["Colour", "Elevation"])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Colour"));

        assert!(FederationConfig::new()
            .with_excluded_columns(["elevation"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_load_and_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cobie.toml");
        let config = FederationConfig::new()
            .with_indexing_base(IndexingBase::RowOne)
            .with_excluded_columns(["Description"]);
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(FederationConfig::load(&path).unwrap(), config);

        let err = FederationConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, CobieError::Config(_)));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COBIE_INDEXING_BASE", "row_one"),
            ("COBIE_UNKNOWN_SHEETS", "drop"),
            ("COBIE_EXCLUDED_COLUMNS", "Description, Height,"),
        ]
        .into_iter()
        .collect();

        let mut config = FederationConfig::default();
        config
            .merge_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.indexing_base, IndexingBase::RowOne);
        assert_eq!(config.unknown_sheets, UnknownSheetPolicy::Drop);
        assert_eq!(config.excluded_columns, vec!["Description", "Height"]);

        let err = config
            .merge_vars(|name| (name == "COBIE_UNKNOWN_SHEETS").then(|| "explode".to_string()))
            .unwrap_err();
        assert!(matches!(err, CobieError::Parse(_)));
    }
}
