//! Test helpers for federation integration tests
//!
//! Row and workbook builders that fill cells by column name, so tests read
//! like the sheets they describe.

#![allow(dead_code)]

use cobie_federate::{CellValue, Row, Sheet, SheetKind, Workbook};

/// Builder for one row of a given sheet kind
#[derive(Debug, Clone)]
pub struct RowFixture {
    kind: SheetKind,
    row: Row,
}

impl RowFixture {
    pub fn new(kind: SheetKind) -> Self {
        Self {
            kind,
            row: Row::empty(kind.schema().column_count()),
        }
    }

    /// Set a cell by column name
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        let index = self
            .kind
            .schema()
            .column_index(column)
            .unwrap_or_else(|| panic!("{} has no column {}", self.kind, column));
        self.row.set_cell(index, value.into());
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

pub fn contact(email: &str) -> Row {
    RowFixture::new(SheetKind::Contact)
        .with("Email", email)
        .with("Category", "Owner")
        .with("Company", "Acme")
        .build()
}

pub fn floor(name: &str, elevation: f64) -> Row {
    RowFixture::new(SheetKind::Floor)
        .with("Name", name)
        .with("Category", "Floor")
        .with("Elevation", elevation)
        .build()
}

pub fn space(name: &str, floor: &str) -> Row {
    RowFixture::new(SheetKind::Space)
        .with("Name", name)
        .with("Category", "Office")
        .with("FloorName", floor)
        .build()
}

pub fn coordinate(name: &str, x: f64) -> Row {
    RowFixture::new(SheetKind::Coordinate)
        .with("Name", name)
        .with("Category", "point")
        .with("SheetName", "Floor")
        .with("RowName", "Level 1")
        .with("CoordinateXAxis", x)
        .with("CoordinateYAxis", 0.0)
        .with("CoordinateZAxis", 0.0)
        .build()
}

pub fn pick_list(unit: &str) -> Row {
    RowFixture::new(SheetKind::PickLists)
        .with("AreaUnit", unit)
        .build()
}

/// Workbook with one sheet per `(kind, rows)` pair, in the given order
pub fn workbook(sheets: Vec<(SheetKind, Vec<Row>)>) -> Workbook {
    let mut workbook = Workbook::new();
    for (kind, rows) in sheets {
        workbook.add_sheet(Sheet::with_rows(kind.name(), rows));
    }
    workbook
}

/// Names in column 0 of every retained row of `kind`
pub fn names(workbook: &Workbook, kind: SheetKind) -> Vec<String> {
    workbook
        .sheet_of_kind(kind)
        .map(|sheet| {
            sheet
                .rows()
                .iter()
                .map(|row| row.cell(0).map(CellValue::canonical).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}
