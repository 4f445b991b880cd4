//! COBie workbook federation engine
//!
//! Merges independently produced COBie workbooks into one, dropping rows whose
//! content fingerprint was already retained while recording where each
//! discarded row came from, then indexes the result and runs an injected list
//! of validation checks over it.
//!
//! ```no_run
//! use cobie_federate::{FederationConfig, Federator, NoopObserver, Workbook};
//!
//! # fn sources() -> Vec<Workbook> { Vec::new() }
//! let federator = Federator::with_default_checks(FederationConfig::default());
//! let federated = federator.merge(sources(), &mut NoopObserver)?;
//! for error in federated.errors() {
//!     println!("{}", error);
//! }
//! # Ok::<(), cobie_common::CobieError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod federate;
pub mod fingerprint;
pub mod index;
pub mod progress;
pub mod report;
pub mod schema;
pub mod validation;
pub mod workbook;

pub use config::{FederationConfig, UnknownSheetPolicy};
pub use federate::Federator;
pub use index::{build_indices, Indices};
pub use progress::{NoopObserver, Progress, ProgressObserver, TracingObserver};
pub use report::{FederationReport, SheetSummary};
pub use schema::{ColumnDef, ColumnType, Reference, SheetKind, SheetSchema};
pub use validation::{validate, Check, CheckContext, Finding, ValidationError};
pub use workbook::{CellValue, RemovalReason, RemovedRow, Row, Sheet, Workbook};
