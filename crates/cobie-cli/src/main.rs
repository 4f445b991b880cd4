//! cobie CLI - Main entry point

use cobie_cli::{commands, Cli, Commands, ConfigCommand};
use cobie_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use clap::Parser;
use std::process;
use tracing::error;

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Verbose: debug to console. Otherwise only warnings and errors.
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("cobie-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute_command(cli: &Cli) -> cobie_cli::Result<()> {
    match &cli.command {
        Commands::Federate {
            inputs,
            output,
            config,
            fail_on_errors,
        } => commands::federate::run(
            inputs,
            output.as_deref(),
            config.resolve()?,
            *fail_on_errors,
            cli.quiet,
        ),

        Commands::Validate {
            input,
            config,
            fail_on_errors,
            format,
        } => commands::validate::run(
            input,
            config.resolve()?,
            *fail_on_errors,
            *format,
            cli.quiet,
        ),

        Commands::Schema { sheet } => commands::schema::run(sheet.as_deref()),

        Commands::Config { command } => match command {
            ConfigCommand::Show { config } => commands::config::show(&config.resolve()?),
        },
    }
}
