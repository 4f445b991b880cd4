//! JSON workbook documents
//!
//! The CLI reads and writes workbooks as JSON. Rows are objects keyed by
//! column name; absent columns are empty. Values are coerced to the column's
//! type, so a Decimal column accepts `3`, `3.5` or `"3.5"`, and a List column
//! accepts an array or a compound string.
//!
//! ```json
//! {
//!   "sheets": [
//!     { "name": "Floor", "rows": [ { "Name": "Level 1", "Category": "Floor" } ] }
//!   ]
//! }
//! ```
//!
//! Written documents also carry each sheet's removed rows (with the index of
//! the source they came from) and its validation errors. Removed rows are read
//! back, so a federated document can be federated again without losing
//! provenance.

use crate::error::{CliError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use cobie_common::{compound, CobieError};
use cobie_federate::{
    CellValue, ColumnType, RemovalReason, RemovedRow, Row, Sheet, SheetSchema, ValidationError,
    Workbook,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

type RowObject = Map<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkbookDocument {
    pub sheets: Vec<SheetDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDocument {
    pub name: String,

    #[serde(default)]
    pub rows: Vec<RowObject>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_rows: Vec<RemovedRowDocument>,

    /// Output only
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedRowDocument {
    pub source_index: usize,
    pub reason: RemovalReason,
    pub row: RowObject,
}

/// Read a workbook document from disk
pub fn load(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let document: WorkbookDocument = serde_json::from_str(&content)?;
    let workbook = document
        .into_workbook()
        .map_err(|e| CliError::invalid_document(path.display().to_string(), e.to_string()))?;
    debug!(path = %path.display(), sheets = workbook.len(), "loaded workbook");
    Ok(workbook)
}

/// Write a workbook document to disk
pub fn save(path: &Path, workbook: &Workbook) -> Result<()> {
    let document = WorkbookDocument::from_workbook(workbook);
    let content = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, content)?;
    debug!(path = %path.display(), "saved workbook");
    Ok(())
}

impl WorkbookDocument {
    /// Convert to the engine's data model, coercing cells to column types
    pub fn into_workbook(self) -> cobie_common::Result<Workbook> {
        let mut workbook = Workbook::new();
        for sheet in self.sheets {
            let mut target = Sheet::new(&sheet.name);
            if workbook.contains_sheet(target.name()) {
                return Err(CobieError::parse(format!(
                    "sheet {} appears more than once",
                    target.name()
                )));
            }
            match target.schema() {
                Some(schema) => {
                    for (index, object) in sheet.rows.iter().enumerate() {
                        target.push_row(row_from_object(&schema, object, index)?);
                    }
                    for (index, removed) in sheet.removed_rows.into_iter().enumerate() {
                        target.push_removed_row(RemovedRow {
                            row: row_from_object(&schema, &removed.row, index)?,
                            reason: removed.reason,
                            source_index: removed.source_index,
                        });
                    }
                }
                None => {
                    // Kept as text so the unknown-sheet policy decides its fate
                    for object in &sheet.rows {
                        let cells = object
                            .values()
                            .map(|value| match value {
                                Value::Null => CellValue::Empty,
                                Value::String(s) => CellValue::text(s.as_str()),
                                other => CellValue::text(other.to_string()),
                            })
                            .collect();
                        target.push_row(Row::new(cells));
                    }
                }
            }
            workbook.add_sheet(target);
        }
        Ok(workbook)
    }

    pub fn from_workbook(workbook: &Workbook) -> Self {
        let sheets = workbook
            .sheets()
            .map(|sheet| {
                let schema = sheet.schema();
                SheetDocument {
                    name: sheet.name().to_string(),
                    rows: sheet
                        .rows()
                        .iter()
                        .map(|row| row_to_object(schema.as_ref(), row))
                        .collect(),
                    removed_rows: sheet
                        .removed_rows()
                        .iter()
                        .map(|removed| RemovedRowDocument {
                            source_index: removed.source_index,
                            reason: removed.reason,
                            row: row_to_object(schema.as_ref(), &removed.row),
                        })
                        .collect(),
                    errors: sheet.errors().to_vec(),
                }
            })
            .collect();
        Self { sheets }
    }
}

fn row_from_object(
    schema: &SheetSchema,
    object: &RowObject,
    index: usize,
) -> cobie_common::Result<Row> {
    let mut row = Row::empty(schema.column_count());
    for (name, value) in object {
        let column = schema.column_index(name).ok_or_else(|| {
            CobieError::parse(format!(
                "sheet {} row {}: unknown column {}",
                schema.name(),
                index,
                name
            ))
        })?;
        let column_type = schema.columns[column].column_type;
        let cell = cell_from_json(value, column_type).ok_or_else(|| {
            CobieError::parse(format!(
                "sheet {} row {}: cannot read {} as {:?} in column {}",
                schema.name(),
                index,
                value,
                column_type,
                name
            ))
        })?;
        row.set_cell(column, cell);
    }
    Ok(row)
}

fn row_to_object(schema: Option<&SheetSchema>, row: &Row) -> RowObject {
    let mut object = Map::new();
    for (index, cell) in row.cells().iter().enumerate() {
        if matches!(cell, CellValue::Empty) {
            continue;
        }
        let name = schema
            .and_then(|s| s.columns.get(index))
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| format!("Column{}", index + 1));
        object.insert(name, cell_to_json(cell));
    }
    object
}

/// Coerce a JSON value to a cell of the given column type
pub fn cell_from_json(value: &Value, column_type: ColumnType) -> Option<CellValue> {
    let cell = match (value, column_type) {
        (Value::Null, _) => CellValue::Empty,
        (Value::String(s), _) if s.trim().is_empty() && column_type != ColumnType::Text => {
            CellValue::Empty
        }

        (Value::String(s), ColumnType::Text) => CellValue::text(s.as_str()),
        (Value::Number(n), ColumnType::Text) => CellValue::text(n.to_string()),
        (Value::Bool(b), ColumnType::Text) => CellValue::text(b.to_string()),

        (Value::Number(n), ColumnType::Integer) => CellValue::Integer(n.as_i64()?),
        (Value::String(s), ColumnType::Integer) => CellValue::Integer(s.trim().parse().ok()?),

        (Value::Number(n), ColumnType::Decimal) => CellValue::Decimal(n.as_f64()?),
        (Value::String(s), ColumnType::Decimal) => {
            CellValue::Decimal(s.trim().parse().ok().filter(|d: &f64| d.is_finite())?)
        }

        (Value::Bool(b), ColumnType::Boolean) => CellValue::Boolean(*b),
        (Value::String(s), ColumnType::Boolean) => {
            CellValue::Boolean(s.trim().to_lowercase().parse().ok()?)
        }

        (Value::String(s), ColumnType::DateTime) => CellValue::DateTime(parse_datetime(s)?),

        (Value::Array(items), ColumnType::List) => CellValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?,
        ),
        (Value::String(s), ColumnType::List) => CellValue::List(compound::decode(s)),

        _ => return None,
    };
    Some(cell)
}

pub fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Integer(i) => Value::from(*i),
        CellValue::Decimal(d) => serde_json::Number::from_f64(*d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::DateTime(_) => Value::String(cell.canonical()),
        CellValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
}
