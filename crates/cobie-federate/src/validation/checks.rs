//! Generic checks derived from schema metadata
//!
//! These are not a COBie rule catalogue. They only enforce what the column
//! definitions already declare: required cells, resolvable references and
//! unique row identity.

use super::{Check, CheckContext, Finding};
use crate::index::normalize_key;
use crate::schema::{Reference, SheetKind};

/// The schema-driven checks, in the order they should run
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(RequiredColumns),
        Box::new(ForeignKeys),
        Box::new(UniqueKeys),
    ]
}

/// A required column holding no value is an error
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredColumns;

impl Check for RequiredColumns {
    fn name(&self) -> &str {
        "required_columns"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.schema
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.required)
            .filter(|(index, _)| ctx.row.cell(*index).map_or(true, |cell| cell.is_empty()))
            .map(|(_, column)| Finding::error(column.name, "Value is required"))
            .collect()
    }
}

/// Every referenced name must resolve in the target sheet's index
///
/// List cells are checked element by element. For columns naming a row of
/// a sheet given in a sibling column, the sibling must name a registered
/// sheet first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForeignKeys;

impl Check for ForeignKeys {
    fn name(&self) -> &str {
        "foreign_keys"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (index, column) in ctx.schema.columns.iter().enumerate() {
            let Some(cell) = ctx.row.cell(index) else {
                continue;
            };
            let target = match column.reference {
                Reference::None => continue,
                Reference::Sheet(kind) => kind,
                Reference::RowOf(sheet_column) => {
                    let Some(sheet_name) = ctx.cell(sheet_column).filter(|c| !c.is_empty()) else {
                        continue;
                    };
                    let sheet_name = sheet_name.canonical();
                    match SheetKind::from_name(&sheet_name) {
                        Some(kind) => kind,
                        None => {
                            if !cell.is_empty() {
                                findings.push(Finding::error(
                                    column.name,
                                    format!("'{}' in {} is not a known sheet", sheet_name.trim(), sheet_column),
                                ));
                            }
                            continue;
                        }
                    }
                }
            };

            for key in cell.key_values() {
                if !ctx.indices.contains(target, &key) {
                    findings.push(Finding::error(
                        column.name,
                        format!("'{}' not found in {}", key, target),
                    ));
                }
            }
        }
        findings
    }
}

/// A row repeating the identity of an earlier row in its sheet is a warning
///
/// Identity is every primary column, compared trimmed and case-insensitively.
/// Only the later rows are reported. Dedup-exempt sheets are skipped since
/// their repeats are expected.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueKeys;

impl Check for UniqueKeys {
    fn name(&self) -> &str {
        "unique_keys"
    }

    fn applies_to(&self, kind: SheetKind) -> bool {
        !kind.schema().dedup_exempt
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Some(key_column) = ctx.schema.key_column() else {
            return Vec::new();
        };
        let Some(key) = ctx.row.cell(key_column).filter(|c| !c.is_empty()) else {
            return Vec::new();
        };

        let identity = |row: &crate::workbook::Row| -> Vec<String> {
            ctx.schema
                .primary_columns()
                .map(|(index, _)| {
                    row.cell(index)
                        .map(|cell| normalize_key(&cell.canonical()))
                        .unwrap_or_default()
                })
                .collect()
        };
        let own = identity(ctx.row);

        let first = ctx
            .indices
            .positions(ctx.schema.kind, &key.canonical())
            .iter()
            .copied()
            .take_while(|&position| position < ctx.row_index)
            .find(|&position| {
                ctx.sheet
                    .row(position)
                    .is_some_and(|earlier| identity(earlier) == own)
            });

        match first {
            Some(position) => vec![Finding::warning(
                ctx.schema.columns[key_column].name,
                format!("Duplicate key, first seen at row {}", ctx.position(position)),
            )],
            None => Vec::new(),
        }
    }
}
