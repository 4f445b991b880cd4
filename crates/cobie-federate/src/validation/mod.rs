//! Validation pass over a federated workbook
//!
//! The validator owns no rules of its own. It walks every sheet row by row,
//! runs the injected [`Check`]s in the order given, and turns their
//! [`Finding`]s into position-addressed [`ValidationError`]s attached to the
//! sheet they describe. A check can only report; it cannot stop the run.

pub mod checks;

use crate::index::Indices;
use crate::schema::{SheetKind, SheetSchema};
use crate::workbook::{CellValue, Row, Sheet, Workbook};
use cobie_common::{ErrorLevel, IndexingBase};
use serde::Serialize;
use tracing::{debug, info, instrument};

pub use checks::{default_checks, ForeignKeys, RequiredColumns, UniqueKeys};

/// One reported problem, addressed by sheet, row position and column
///
/// Created only by [`validate`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    sheet_name: String,
    row: usize,
    column: String,
    message: String,
    level: ErrorLevel,
    check: String,
}

impl ValidationError {
    pub(crate) fn new(sheet_name: &str, row: usize, check: &str, finding: Finding) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            row,
            column: finding.column,
            message: finding.message,
            level: finding.level,
            check: check.to_string(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Row position, already adjusted for the indexing base
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    /// Name of the check that reported it
    pub fn check(&self) -> &str {
        &self.check
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} row {} column {}: {}",
            self.level, self.sheet_name, self.row, self.column, self.message
        )
    }
}

/// What a check reports about one row
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub column: String,
    pub message: String,
    pub level: ErrorLevel,
}

impl Finding {
    pub fn error(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            message: message.into(),
            level: ErrorLevel::Error,
        }
    }

    pub fn warning(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            message: message.into(),
            level: ErrorLevel::Warning,
        }
    }
}

/// Everything a check may look at while judging one row
pub struct CheckContext<'a> {
    pub workbook: &'a Workbook,
    pub indices: &'a Indices,
    pub sheet: &'a Sheet,
    pub schema: SheetSchema,
    pub row: &'a Row,
    /// Zero-based position of the row within its sheet
    pub row_index: usize,
    pub indexing_base: IndexingBase,
}

impl CheckContext<'_> {
    /// Cell of the current row in the named column
    pub fn cell(&self, column: &str) -> Option<&CellValue> {
        self.row.cell(self.schema.column_index(column)?)
    }

    /// Reported position for another row of the same sheet
    pub fn position(&self, row_index: usize) -> usize {
        self.indexing_base.position(row_index)
    }
}

/// One validation rule
pub trait Check {
    /// Stable name recorded on every error the check reports
    fn name(&self) -> &str;

    fn applies_to(&self, _kind: SheetKind) -> bool {
        true
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Finding>;
}

/// Run `checks` over every row of `workbook` and attach the results
///
/// Rows are visited in sheet order, then row order; each row runs the checks
/// in the order given. Each sheet's previous errors are replaced.
/// `on_sheet_complete` fires once per sheet, in workbook order, after that
/// sheet's checks have run; sheets outside the registry are reported
/// complete without being checked. Returns the number of errors attached.
#[instrument(skip_all, fields(sheets = workbook.len(), checks = checks.len(), base = %indexing_base))]
pub fn validate<F>(
    workbook: &mut Workbook,
    indices: &Indices,
    checks: &[Box<dyn Check>],
    indexing_base: IndexingBase,
    mut on_sheet_complete: F,
) -> usize
where
    F: FnMut(&str),
{
    let mut per_sheet = Vec::with_capacity(workbook.len());
    for sheet in workbook.sheets() {
        let errors = validate_sheet(workbook, indices, sheet, checks, indexing_base);
        debug!(sheet = sheet.name(), errors = errors.len(), "validated sheet");
        per_sheet.push(errors);
        on_sheet_complete(sheet.name());
    }

    let mut total = 0;
    for (sheet, errors) in workbook.sheets_mut().zip(per_sheet) {
        total += errors.len();
        sheet.set_errors(errors);
    }

    info!(errors = total, "validation finished");
    total
}

fn validate_sheet(
    workbook: &Workbook,
    indices: &Indices,
    sheet: &Sheet,
    checks: &[Box<dyn Check>],
    indexing_base: IndexingBase,
) -> Vec<ValidationError> {
    let Some(schema) = sheet.schema() else {
        return Vec::new();
    };
    let applicable: Vec<&dyn Check> = checks
        .iter()
        .map(|check| check.as_ref())
        .filter(|check| check.applies_to(schema.kind))
        .collect();

    let mut errors = Vec::new();
    for (row_index, row) in sheet.rows().iter().enumerate() {
        let ctx = CheckContext {
            workbook,
            indices,
            sheet,
            schema,
            row,
            row_index,
            indexing_base,
        };
        let position = indexing_base.position(row_index);
        for check in &applicable {
            errors.extend(
                check
                    .check(&ctx)
                    .into_iter()
                    .map(|finding| ValidationError::new(sheet.name(), position, check.name(), finding)),
            );
        }
    }
    errors
}
