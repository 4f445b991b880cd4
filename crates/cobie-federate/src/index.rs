//! Per-sheet lookup indices
//!
//! Built once over a federated workbook, keyed by each schema's designated
//! key field (Email for Contact, Name elsewhere). Keys are matched trimmed
//! and case-insensitively. Indices are not maintained incrementally: whoever
//! edits rows afterwards rebuilds them.

use crate::schema::SheetKind;
use crate::workbook::Workbook;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Normalised form under which keys are stored and looked up
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Key -> row positions for one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetIndex {
    key_column: usize,
    entries: HashMap<String, Vec<usize>>,
}

impl SheetIndex {
    /// Column the index is keyed on
    pub fn key_column(&self) -> usize {
        self.key_column
    }

    /// Positions of every row carrying `key`, in row order
    pub fn positions(&self, key: &str) -> &[usize] {
        self.entries
            .get(&normalize_key(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First row carrying `key`
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.positions(key).first().copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        !self.positions(key).is_empty()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup indices for every keyed sheet of a workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indices {
    sheets: HashMap<SheetKind, SheetIndex>,
}

impl Indices {
    pub fn sheet(&self, kind: SheetKind) -> Option<&SheetIndex> {
        self.sheets.get(&kind)
    }

    pub fn positions(&self, kind: SheetKind, key: &str) -> &[usize] {
        self.sheets
            .get(&kind)
            .map(|index| index.positions(key))
            .unwrap_or(&[])
    }

    pub fn resolve(&self, kind: SheetKind, key: &str) -> Option<usize> {
        self.positions(kind, key).first().copied()
    }

    pub fn contains(&self, kind: SheetKind, key: &str) -> bool {
        !self.positions(kind, key).is_empty()
    }

    /// Number of indexed sheets
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Build indices for every registered, keyed sheet of `workbook`
#[instrument(skip_all, fields(sheets = workbook.len()))]
pub fn build_indices(workbook: &Workbook) -> Indices {
    let mut indices = Indices::default();

    for sheet in workbook.sheets() {
        let Some(schema) = sheet.schema() else {
            continue;
        };
        let Some(key_column) = schema.key_column() else {
            continue;
        };

        let mut entries: HashMap<String, Vec<usize>> = HashMap::with_capacity(sheet.row_count());
        for (position, row) in sheet.rows().iter().enumerate() {
            let Some(cell) = row.cell(key_column) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            entries
                .entry(normalize_key(&cell.canonical()))
                .or_default()
                .push(position);
        }

        debug!(sheet = %schema.kind, keys = entries.len(), "indexed sheet");
        indices
            .sheets
            .insert(schema.kind, SheetIndex { key_column, entries });
    }

    indices
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::workbook::{CellValue, Row, Sheet};

    fn named(kind: SheetKind, names: &[&str]) -> Sheet {
        let width = kind.schema().column_count();
        let rows = names
            .iter()
            .map(|name| {
                let mut row = Row::empty(width);
                row.set_cell(0, CellValue::text(*name));
                row
            })
            .collect();
        Sheet::with_rows(kind.name(), rows)
    }

    #[test]
    fn test_lookup_by_key() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(named(SheetKind::Floor, &["Level 1", "Level 2", "Roof"]));
        let indices = build_indices(&workbook);

        assert_eq!(indices.resolve(SheetKind::Floor, "Level 2"), Some(1));
        assert_eq!(indices.resolve(SheetKind::Floor, "  roof "), Some(2));
        assert!(!indices.contains(SheetKind::Floor, "Basement"));
        assert!(!indices.contains(SheetKind::Space, "Level 1"));
    }

    #[test]
    fn test_repeated_keys_keep_all_positions() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(named(SheetKind::Attribute, &["Colour", "Weight", "colour"]));
        let indices = build_indices(&workbook);
        assert_eq!(indices.positions(SheetKind::Attribute, "COLOUR"), &[0, 2]);
    }

    #[test]
    fn test_blank_keys_and_unkeyed_sheets_are_skipped() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(named(SheetKind::Floor, &["Level 1", " "]));
        workbook.add_sheet(named(SheetKind::PickLists, &["m2"]));
        workbook.add_sheet(Sheet::new("Widgets"));
        let indices = build_indices(&workbook);

        assert_eq!(indices.len(), 1);
        assert_eq!(indices.sheet(SheetKind::Floor).unwrap().len(), 1);
        assert!(indices.sheet(SheetKind::PickLists).is_none());
    }
}
