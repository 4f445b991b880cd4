//! Per-sheet summary of a federated workbook

use crate::workbook::Workbook;
use cobie_common::ErrorLevel;
use serde::Serialize;

/// Counts for one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub retained: usize,
    pub removed: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Counts for every sheet, in workbook order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FederationReport {
    pub sheets: Vec<SheetSummary>,
}

impl FederationReport {
    pub fn from_workbook(workbook: &Workbook) -> Self {
        let sheets = workbook
            .sheets()
            .map(|sheet| {
                let warnings = sheet
                    .errors()
                    .iter()
                    .filter(|e| e.level() == ErrorLevel::Warning)
                    .count();
                SheetSummary {
                    name: sheet.name().to_string(),
                    retained: sheet.row_count(),
                    removed: sheet.removed_rows().len(),
                    errors: sheet.errors().len() - warnings,
                    warnings,
                }
            })
            .collect();
        Self { sheets }
    }

    pub fn retained(&self) -> usize {
        self.sheets.iter().map(|s| s.retained).sum()
    }

    pub fn removed(&self) -> usize {
        self.sheets.iter().map(|s| s.removed).sum()
    }

    pub fn errors(&self) -> usize {
        self.sheets.iter().map(|s| s.errors).sum()
    }

    pub fn warnings(&self) -> usize {
        self.sheets.iter().map(|s| s.warnings).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::FederationConfig;
    use crate::federate::Federator;
    use crate::progress::NoopObserver;
    use crate::schema::SheetKind;
    use crate::workbook::{Row, Sheet};

    #[test]
    fn test_report_counts() {
        let width = SheetKind::Floor.schema().column_count();
        let mut named = Row::empty(width);
        named.set_cell(0, "Level 1".into());
        named.set_cell(3, "Floor".into());
        let uncategorised = {
            let mut row = Row::empty(width);
            row.set_cell(0, "Level 2".into());
            row
        };

        let mut source = Workbook::new();
        source.add_sheet(Sheet::with_rows("Floor", vec![named.clone(), uncategorised, named]));
        source.add_sheet(Sheet::new("Contact"));

        let federator = Federator::with_default_checks(FederationConfig::default());
        let result = federator.merge(vec![source], &mut NoopObserver).unwrap();
        let report = FederationReport::from_workbook(&result);

        assert_eq!(
            report.sheets[0],
            SheetSummary {
                name: "Floor".to_string(),
                retained: 2,
                removed: 1,
                errors: 1,
                warnings: 0,
            }
        );
        assert_eq!(report.sheets[1].name, "Contact");
        assert_eq!(report.retained(), 2);
        assert_eq!(report.removed(), 1);
        assert!(report.has_errors());
    }
}
