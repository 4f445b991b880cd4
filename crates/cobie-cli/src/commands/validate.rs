//! `cobie validate` command implementation
//!
//! Federates a single workbook with itself as the only source, so duplicate
//! rows inside it are removed, then lists what validation reported.

use super::federate::{federate, print_report};
use crate::document;
use crate::error::{CliError, Result};
use crate::OutputFormat;
use cobie_common::ErrorLevel;
use cobie_federate::{FederationConfig, FederationReport, ValidationError};
use colored::Colorize;
use std::path::Path;

pub fn run(
    input: &Path,
    config: FederationConfig,
    fail_on_errors: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let workbook = document::load(input)?;
    let federated = federate(vec![workbook], config, quiet || format == OutputFormat::Json)?;
    let report = FederationReport::from_workbook(&federated);
    let errors: Vec<&ValidationError> = federated.errors().collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
        }
        OutputFormat::Text => {
            if errors.is_empty() {
                println!("{} No validation errors", "✓".green());
            } else {
                for error in &errors {
                    println!("{}", format_error(error));
                }
                println!();
            }
            print_report(&report);
        }
    }

    if fail_on_errors && report.has_errors() {
        return Err(CliError::ValidationFailed(report.errors()));
    }
    Ok(())
}

fn format_error(error: &ValidationError) -> String {
    let level = match error.level() {
        ErrorLevel::Error => "error".red().bold(),
        ErrorLevel::Warning => "warning".yellow().bold(),
    };
    format!(
        "{} {} row {}, {}: {}",
        level,
        error.sheet_name().cyan(),
        error.row(),
        error.column(),
        error.message()
    )
}
