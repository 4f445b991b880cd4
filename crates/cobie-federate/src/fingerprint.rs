//! Row fingerprints
//!
//! A fingerprint digests a row's significant cells in schema column order.
//! Provenance columns (`CreatedBy`, `CreatedOn`, `Ext*`) never take part, and
//! callers may exclude further columns by name. Two rows with the same
//! significant content always share a fingerprint, across processes too.

use crate::schema::SheetSchema;
use crate::workbook::{Row, Workbook};
use cobie_common::checksum::FieldDigest;

/// Fingerprint of `row` under `schema`, leaving out `excluded_columns`
pub fn fingerprint(row: &Row, schema: &SheetSchema, excluded_columns: &[String]) -> String {
    let mut digest = FieldDigest::new();
    for (column, cell) in schema.columns.iter().zip(row.cells()) {
        if !column.significant || is_excluded(column.name, excluded_columns) {
            continue;
        }
        digest.update(&cell.canonical());
    }
    digest.finish()
}

fn is_excluded(column: &str, excluded_columns: &[String]) -> bool {
    excluded_columns
        .iter()
        .any(|name| name.trim().eq_ignore_ascii_case(column))
}

/// Snapshot the current fingerprint of every retained row as its initial hash
///
/// Returns the number of rows snapshotted. Rows that already carry a snapshot
/// keep it.
pub fn snapshot_initial_hashes(workbook: &mut Workbook, excluded_columns: &[String]) -> usize {
    let mut count = 0;
    for sheet in workbook.sheets_mut() {
        let Some(schema) = sheet.schema() else {
            continue;
        };
        for row in sheet.rows_mut() {
            let hash = fingerprint(row, &schema, excluded_columns);
            if row.snapshot_initial_hash(hash) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::SheetKind;
    use crate::workbook::{CellValue, Sheet};
    use cobie_common::checksum::DIGEST_HEX_LEN;

    fn floor(name: &str, created_by: &str, elevation: f64) -> Row {
        let schema = SheetKind::Floor.schema();
        let mut row = Row::empty(schema.column_count());
        row.set_cell(0, name.into());
        row.set_cell(1, created_by.into());
        row.set_cell(3, "Floor".into());
        row.set_cell(8, CellValue::Decimal(elevation));
        row
    }

    #[test]
    fn test_identical_content_identical_fingerprint() {
        let schema = SheetKind::Floor.schema();
        let a = fingerprint(&floor("Level 1", "a@x.com", 0.0), &schema, &[]);
        let b = fingerprint(&floor("Level 1", "a@x.com", 0.0), &schema, &[]);
        assert_eq!(a, b);
        assert_eq!(a.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_significant_change_alters_fingerprint() {
        let schema = SheetKind::Floor.schema();
        let a = fingerprint(&floor("Level 1", "", 0.0), &schema, &[]);
        let b = fingerprint(&floor("Level 1", "", 3.5), &schema, &[]);
        let c = fingerprint(&floor("Level 2", "", 0.0), &schema, &[]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_signed_zero_shares_a_fingerprint() {
        let schema = SheetKind::Floor.schema();
        let positive = floor("Level 1", "", 0.0);
        let negative = floor("Level 1", "", -0.0);
        assert_eq!(positive, negative);
        assert_eq!(
            fingerprint(&positive, &schema, &[]),
            fingerprint(&negative, &schema, &[])
        );
    }

    #[test]
    fn test_provenance_columns_are_ignored() {
        let schema = SheetKind::Floor.schema();
        let a = fingerprint(&floor("Level 1", "a@x.com", 0.0), &schema, &[]);
        let b = fingerprint(&floor("Level 1", "b@y.com", 0.0), &schema, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_excluded_columns_are_ignored() {
        let schema = SheetKind::Floor.schema();
        let excluded = vec!["elevation".to_string()];
        let a = fingerprint(&floor("Level 1", "", 0.0), &schema, &excluded);
        let b = fingerprint(&floor("Level 1", "", 9.0), &schema, &excluded);
        assert_eq!(a, b);
    }

    #[test]
    fn test_list_cells_are_fingerprinted_by_content() {
        let schema = SheetKind::Zone.schema();
        let zone = |spaces: CellValue| {
            let mut row = Row::empty(schema.column_count());
            row.set_cell(0, "Zone A".into());
            row.set_cell(4, spaces);
            row
        };
        let ab = fingerprint(&zone(CellValue::list(["A", "B"])), &schema, &[]);
        let ab2 = fingerprint(&zone(CellValue::list(["A", "B"])), &schema, &[]);
        let joined = fingerprint(&zone(CellValue::list(["A , B"])), &schema, &[]);
        assert_eq!(ab, ab2);
        assert_ne!(ab, joined);
    }

    #[test]
    fn test_snapshot_initial_hashes() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::with_rows(
            "Floor",
            vec![floor("Level 1", "", 0.0), floor("Level 2", "", 3.0)],
        ));
        workbook.add_sheet(Sheet::with_rows("Widgets", vec![Row::empty(1)]));

        assert_eq!(snapshot_initial_hashes(&mut workbook, &[]), 2);
        assert_eq!(snapshot_initial_hashes(&mut workbook, &[]), 0);

        let sheet = workbook.sheet("Floor").unwrap();
        let schema = SheetKind::Floor.schema();
        let expected = fingerprint(&sheet.rows()[0], &schema, &[]);
        assert_eq!(sheet.rows()[0].initial_hash(), Some(expected.as_str()));
        assert!(workbook.sheet("Widgets").unwrap().rows()[0].initial_hash().is_none());
    }

    #[test]
    fn test_changed_rows_detects_edits() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::with_rows(
            "Floor",
            vec![floor("Level 1", "", 0.0), floor("Level 2", "", 3.0)],
        ));
        snapshot_initial_hashes(&mut workbook, &[]);

        let sheet = workbook.sheet_mut("Floor").unwrap();
        assert!(sheet.changed_rows(&[]).is_empty());

        sheet.row_mut(1).unwrap().set_cell(8, CellValue::Decimal(4.0));
        sheet.row_mut(0).unwrap().set_cell(1, "someone@else.com".into());
        assert_eq!(sheet.changed_rows(&[]), vec![1]);
    }
}
