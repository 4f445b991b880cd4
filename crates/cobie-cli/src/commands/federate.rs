//! `cobie federate` command implementation
//!
//! Loads workbook documents in argument order, federates and validates them,
//! prints a per-sheet summary and optionally writes the result.

use crate::document;
use crate::error::{CliError, Result};
use crate::progress::BarObserver;
use cobie_federate::{FederationConfig, FederationReport, Federator, Workbook};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use std::path::{Path, PathBuf};
use tracing::info;

/// Federate `inputs` and report
pub fn run(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config: FederationConfig,
    fail_on_errors: bool,
    quiet: bool,
) -> Result<()> {
    let sources = inputs
        .iter()
        .map(|path| document::load(path))
        .collect::<Result<Vec<_>>>()?;

    let federated = federate(sources, config, quiet)?;
    let report = FederationReport::from_workbook(&federated);

    if let Some(path) = output {
        document::save(path, &federated)?;
        info!(path = %path.display(), "wrote federated workbook");
    }

    print_report(&report);
    if let Some(path) = output {
        println!("Written to {}", path.display().to_string().green());
    }

    if fail_on_errors && report.has_errors() {
        return Err(CliError::ValidationFailed(report.errors()));
    }
    Ok(())
}

/// Run the engine with the default checks, drawing a progress bar unless quiet
pub fn federate(sources: Vec<Workbook>, config: FederationConfig, quiet: bool) -> Result<Workbook> {
    let federator = Federator::with_default_checks(config);
    let mut observer = if quiet {
        BarObserver::hidden()
    } else {
        BarObserver::new()
    };
    let result = federator.merge(sources, &mut observer);
    observer.finish();
    Ok(result?)
}

/// Print the per-sheet summary table and totals
pub fn print_report(report: &FederationReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Sheet", "Retained", "Removed", "Errors", "Warnings"]);

    for sheet in &report.sheets {
        table.add_row(vec![
            sheet.name.clone(),
            sheet.retained.to_string(),
            sheet.removed.to_string(),
            sheet.errors.to_string(),
            sheet.warnings.to_string(),
        ]);
    }

    println!("{}", table);
    println!();
    println!("{}", "Summary:".cyan().bold());
    println!("  Retained rows: {}", report.retained());
    println!("  Removed rows:  {}", report.removed());

    let errors = report.errors().to_string();
    let errors = if report.has_errors() {
        errors.red().bold()
    } else {
        errors.green()
    };
    println!("  Errors:        {}", errors);
    println!("  Warnings:      {}", report.warnings().to_string().yellow());
}
