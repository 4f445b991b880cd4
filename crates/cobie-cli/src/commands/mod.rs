//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod config;
pub mod federate;
pub mod schema;
pub mod validate;
