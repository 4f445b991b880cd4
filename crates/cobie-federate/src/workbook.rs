//! Workbook data model
//!
//! A [`Workbook`] is an ordered map of sheet name to [`Sheet`]; iteration
//! follows insertion order. Sheets own their retained rows, the rows the
//! federator discarded, and the validation errors reported against them.

use crate::fingerprint;
use crate::index::Indices;
use crate::schema::{ColumnType, SheetKind, SheetSchema};
use crate::validation::ValidationError;
use chrono::{NaiveDateTime, Timelike};
use indexmap::IndexMap;

/// One typed cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    List(Vec<String>),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CellValue::List(items.into_iter().map(Into::into).collect())
    }

    /// No usable content: empty, blank text, or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            _ => false,
        }
    }

    /// Canonical text rendering; list cells go through the compound codec
    pub fn canonical(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            // -0.0 == 0.0, so both render as "0"
            CellValue::Decimal(d) if *d == 0.0 => "0".to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
                if dt.nanosecond() != 0 {
                    out.push_str(&format!(".{:09}", dt.nanosecond()));
                }
                out
            }
            CellValue::List(items) => cobie_common::compound::encode(items),
        }
    }

    /// Names this cell refers to: each non-blank element of a list, or the
    /// canonical text of any other non-empty value
    pub fn key_values(&self) -> Vec<String> {
        match self {
            CellValue::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            other if other.is_empty() => Vec::new(),
            other => vec![other.canonical().trim().to_string()],
        }
    }

    /// Whether the value may sit in a column of the given type
    pub fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (CellValue::Empty, _)
                | (CellValue::Text(_), ColumnType::Text)
                | (CellValue::Integer(_), ColumnType::Integer | ColumnType::Decimal)
                | (CellValue::Decimal(_), ColumnType::Decimal)
                | (CellValue::Boolean(_), ColumnType::Boolean)
                | (CellValue::DateTime(_), ColumnType::DateTime)
                | (CellValue::List(_), ColumnType::List)
        )
    }

    /// Short name of the value's type, for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Integer(_) => "integer",
            CellValue::Decimal(_) => "decimal",
            CellValue::Boolean(_) => "boolean",
            CellValue::DateTime(_) => "datetime",
            CellValue::List(_) => "list",
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

/// One record of a sheet, cells in schema column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<CellValue>,
    merge_hash: Option<String>,
    initial_hash: Option<String>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self {
            cells,
            merge_hash: None,
            initial_hash: None,
        }
    }

    /// A row of `width` empty cells
    pub fn empty(width: usize) -> Self {
        Self::new(vec![CellValue::Empty; width])
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Replace one cell, returning the previous value, or `None` when out of range
    pub fn set_cell(&mut self, index: usize, value: CellValue) -> Option<CellValue> {
        self.cells
            .get_mut(index)
            .map(|cell| std::mem::replace(cell, value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Fingerprint under which the row was retained during federation
    pub fn merge_hash(&self) -> Option<&str> {
        self.merge_hash.as_deref()
    }

    /// Fingerprint snapshot taken once federation completed
    pub fn initial_hash(&self) -> Option<&str> {
        self.initial_hash.as_deref()
    }

    pub(crate) fn set_merge_hash(&mut self, hash: String) {
        self.merge_hash = Some(hash);
    }

    /// Write the post-merge snapshot; a second write is ignored
    pub(crate) fn snapshot_initial_hash(&mut self, hash: String) -> bool {
        if self.initial_hash.is_some() {
            return false;
        }
        self.initial_hash = Some(hash);
        true
    }

    /// Forget hashes carried in from an earlier federation run
    pub(crate) fn clear_hashes(&mut self) {
        self.merge_hash = None;
        self.initial_hash = None;
    }
}

/// Why the federator discarded a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Same fingerprint as a row already retained
    DuplicateOfRetained,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalReason::DuplicateOfRetained => write!(f, "duplicate of retained row"),
        }
    }
}

/// A discarded row and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedRow {
    pub row: Row,
    pub reason: RemovalReason,
    /// Zero-based position of the source workbook in the federation input
    pub source_index: usize,
}

/// One named sheet: retained rows, removed rows, and reported errors
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    kind: Option<SheetKind>,
    rows: Vec<Row>,
    removed_rows: Vec<RemovedRow>,
    errors: Vec<ValidationError>,
}

impl Sheet {
    /// A sheet as read from a source; the name need not be registered
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match SheetKind::from_name(&name) {
            Some(kind) => Self::for_kind(kind),
            None => Self {
                name,
                kind: None,
                rows: Vec::new(),
                removed_rows: Vec::new(),
                errors: Vec::new(),
            },
        }
    }

    /// An empty sheet of a registered kind
    pub fn for_kind(kind: SheetKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind: Some(kind),
            rows: Vec::new(),
            removed_rows: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut sheet = Self::new(name);
        sheet.rows = rows;
        sheet
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered kind, `None` for a name outside the registry
    pub fn kind(&self) -> Option<SheetKind> {
        self.kind
    }

    pub fn schema(&self) -> Option<SheetSchema> {
        self.kind.map(SheetKind::schema)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` in the column called `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.schema()?.column_index(column)?;
        self.rows.get(row)?.cell(index)
    }

    pub fn removed_rows(&self) -> &[RemovedRow] {
        &self.removed_rows
    }

    /// Record a discarded row, e.g. when re-reading an earlier federation result
    pub fn push_removed_row(&mut self, removed: RemovedRow) {
        self.removed_rows.push(removed);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: Vec<ValidationError>) {
        self.errors = errors;
    }

    pub(crate) fn into_parts(self) -> (Vec<Row>, Vec<RemovedRow>) {
        (self.rows, self.removed_rows)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Positions of retained rows edited since their post-merge snapshot
    ///
    /// Rows without a snapshot are never reported.
    pub fn changed_rows(&self, excluded_columns: &[String]) -> Vec<usize> {
        let Some(schema) = self.schema() else {
            return Vec::new();
        };
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.initial_hash().is_some_and(|initial| {
                    fingerprint::fingerprint(row, &schema, excluded_columns) != initial
                })
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Ordered collection of sheets, plus the lookup indices built for it
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
    indices: Indices,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered sheet names are stored under their canonical spelling
    fn key_for(name: &str) -> String {
        match SheetKind::from_name(name) {
            Some(kind) => kind.name().to_string(),
            None => name.trim().to_string(),
        }
    }

    /// Add a sheet at the end, or replace the sheet of the same name in place
    ///
    /// Returns the replaced sheet, if any.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Option<Sheet> {
        self.sheets.insert(Self::key_for(sheet.name()), sheet)
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(&Self::key_for(name))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(&Self::key_for(name))
    }

    pub fn sheet_of_kind(&self, kind: SheetKind) -> Option<&Sheet> {
        self.sheets.get(kind.name())
    }

    pub fn contains_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(&Self::key_for(name))
    }

    /// Sheets in insertion order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    /// The sheet of `kind`, appended empty if the workbook has none yet
    pub(crate) fn sheet_or_create(&mut self, kind: SheetKind) -> &mut Sheet {
        self.sheets
            .entry(kind.name().to_string())
            .or_insert_with(|| kind.create_empty_sheet())
    }

    pub(crate) fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.values_mut()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn into_sheets(self) -> impl Iterator<Item = Sheet> {
        self.sheets.into_values()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Validation errors of every sheet, in sheet order
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.sheets.values().flat_map(|sheet| sheet.errors().iter())
    }

    pub fn error_count(&self) -> usize {
        self.sheets.values().map(|sheet| sheet.errors().len()).sum()
    }

    /// Lookup indices as of the last build
    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub(crate) fn set_indices(&mut self, indices: Indices) {
        self.indices = indices;
    }

    /// Rebuild the lookup indices after rows were edited
    pub fn rebuild_indices(&mut self) {
        self.indices = crate::index::build_indices(self);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_emptiness() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::text("   ").is_empty());
        assert!(CellValue::List(vec![]).is_empty());
        assert!(CellValue::list([" ", ""]).is_empty());
        assert!(!CellValue::Integer(0).is_empty());
        assert!(!CellValue::Boolean(false).is_empty());
    }

    #[test]
    fn test_cell_canonical_forms() {
        assert_eq!(CellValue::Decimal(2.5).canonical(), "2.5");
        assert_eq!(CellValue::Integer(-3).canonical(), "-3");
        assert_eq!(CellValue::Decimal(-0.0).canonical(), "0");
        assert_eq!(CellValue::Decimal(0.0).canonical(), "0");
        assert_eq!(CellValue::list(["a", "b,c"]).canonical(), r"a , b\,c");
        let dt = NaiveDateTime::parse_from_str("2024-03-01T09:30:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(CellValue::DateTime(dt).canonical(), "2024-03-01T09:30:00");
    }

    #[test]
    fn test_key_values() {
        assert_eq!(CellValue::text(" Level 1 ").key_values(), vec!["Level 1"]);
        assert_eq!(CellValue::list(["A", " ", "B"]).key_values(), vec!["A", "B"]);
        assert!(CellValue::Empty.key_values().is_empty());
    }

    #[test]
    fn test_cell_fits_column_type() {
        assert!(CellValue::Empty.fits(ColumnType::Decimal));
        assert!(CellValue::Integer(3).fits(ColumnType::Decimal));
        assert!(!CellValue::Decimal(3.0).fits(ColumnType::Integer));
        assert!(!CellValue::text("x").fits(ColumnType::List));
    }

    #[test]
    fn test_initial_hash_is_written_once() {
        let mut row = Row::empty(2);
        assert!(row.snapshot_initial_hash("first".into()));
        assert!(!row.snapshot_initial_hash("second".into()));
        assert_eq!(row.initial_hash(), Some("first"));
    }

    #[test]
    fn test_set_cell() {
        let mut row = Row::new(vec!["a".into(), CellValue::Empty]);
        assert_eq!(row.set_cell(1, "b".into()), Some(CellValue::Empty));
        assert_eq!(row.cell(1), Some(&CellValue::text("b")));
        assert_eq!(row.set_cell(5, "c".into()), None);
    }

    #[test]
    fn test_sheet_name_resolution() {
        let known = Sheet::new("floor");
        assert_eq!(known.name(), "Floor");
        assert_eq!(known.kind(), Some(SheetKind::Floor));

        let unknown = Sheet::new("Widgets");
        assert_eq!(unknown.name(), "Widgets");
        assert_eq!(unknown.kind(), None);
    }

    #[test]
    fn test_sheet_or_create_uses_registry_sheet() {
        let mut workbook = Workbook::new();
        let created = workbook.sheet_or_create(SheetKind::Zone);
        assert_eq!(created, &SheetKind::Zone.create_empty_sheet());
        created.push_row(Row::empty(SheetKind::Zone.schema().column_count()));

        assert_eq!(workbook.sheet_or_create(SheetKind::Zone).row_count(), 1);
        assert_eq!(workbook.len(), 1);
    }

    #[test]
    fn test_workbook_preserves_insertion_order() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::new("Space"));
        workbook.add_sheet(Sheet::new("Contact"));
        workbook.add_sheet(Sheet::new("Floor"));
        let names: Vec<&str> = workbook.sheet_names().collect();
        assert_eq!(names, vec!["Space", "Contact", "Floor"]);

        assert!(workbook.sheet("SPACE").is_some());
        assert!(workbook.sheet_of_kind(SheetKind::Floor).is_some());
        assert!(workbook.add_sheet(Sheet::new("Contact")).is_some());
        assert_eq!(workbook.len(), 3);
    }
}
