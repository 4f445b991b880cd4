//! `cobie config` command implementation

use crate::error::{CliError, Result};
use cobie_federate::FederationConfig;
use colored::Colorize;

/// Show the effective configuration
pub fn show(config: &FederationConfig) -> Result<()> {
    let rendered = config.to_toml().map_err(|e| CliError::config(e.to_string()))?;

    println!("{}", "Federation Configuration:".cyan().bold());
    println!();
    println!("{}", rendered.trim_end());
    println!();
    println!("{}", "Environment Variables:".cyan());
    println!("  COBIE_CONFIG            - Config file (TOML)");
    println!("  COBIE_INDEXING_BASE     - row_one or row_two");
    println!("  COBIE_UNKNOWN_SHEETS    - reject or drop");
    println!("  COBIE_EXCLUDED_COLUMNS  - Comma-separated column names");
    println!("  COBIE_LOG_LEVEL         - trace, debug, info, warn, error");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_show() {
        assert!(show(&FederationConfig::default()).is_ok());
    }
}
