//! cobie CLI library
//!
//! Command-line front end for the federation engine:
//!
//! - **Federation**: merge workbook documents in order (`cobie federate`)
//! - **Validation**: check a single workbook (`cobie validate`)
//! - **Schema**: list sheet kinds and their columns (`cobie schema`)
//! - **Configuration**: show the effective settings (`cobie config show`)

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod progress;

pub use config::ConfigArgs;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cobie - COBie workbook federation and validation
#[derive(Parser, Debug)]
#[command(name = "cobie")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge workbooks into one, then validate the result
    Federate {
        /// Workbook documents, in merge order (the first wins ties)
        #[arg(required = true, value_name = "INPUT")]
        inputs: Vec<PathBuf>,

        /// Where to write the federated workbook
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Exit with an error when validation reports errors
        #[arg(long)]
        fail_on_errors: bool,
    },

    /// Validate a single workbook
    Validate {
        /// Workbook document
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Exit with an error when validation reports errors
        #[arg(long)]
        fail_on_errors: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show sheet kinds, or the columns of one sheet
    Schema {
        /// Sheet name
        sheet: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration as TOML
    Show {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
