//! COBie Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the COBie federation workspace.
//!
//! # Overview
//!
//! This crate provides the leaf functionality used by every workspace member:
//!
//! - **Error Handling**: the run-terminating error type and result alias
//! - **Checksums**: deterministic content digests used as row fingerprints
//! - **Compound strings**: lossless packing of string lists into one cell
//! - **Types**: indexing base and error severity shared by engine and CLI
//!
//! # Example
//!
//! ```
//! use cobie_common::compound;
//!
//! let cell = compound::encode(&["Kitchen".to_string(), "Hall, East".to_string()]);
//! assert_eq!(compound::decode(&cell), vec!["Kitchen", "Hall, East"]);
//! ```

pub mod checksum;
pub mod compound;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CobieError, Result};
pub use types::{ErrorLevel, IndexingBase};
