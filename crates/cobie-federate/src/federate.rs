//! Workbook federation
//!
//! Merges source workbooks into one, in input order. Within every sheet not
//! exempt from deduplication, a row is retained only if no retained row
//! already carries its fingerprint; otherwise it is recorded as removed with
//! the index of the source it came from. The first source wins content ties,
//! so federation is not commutative.
//!
//! Every structural check runs before any merging, so a failed run never
//! leaves a half-merged workbook behind.

use crate::config::{FederationConfig, UnknownSheetPolicy};
use crate::fingerprint::{fingerprint, snapshot_initial_hashes};
use crate::index::build_indices;
use crate::progress::{Progress, ProgressObserver};
use crate::schema::SheetKind;
use crate::validation::{self, default_checks, Check};
use crate::workbook::{RemovalReason, RemovedRow, Workbook};
use cobie_common::{CobieError, Result};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Federates workbooks and validates the result
pub struct Federator {
    config: FederationConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Federator {
    /// A federator that runs no checks
    pub fn new(config: FederationConfig) -> Self {
        Self {
            config,
            checks: Vec::new(),
        }
    }

    /// A federator running the schema-driven default checks
    pub fn with_default_checks(config: FederationConfig) -> Self {
        Self::new(config).with_checks(default_checks())
    }

    /// Replace the ordered check list
    pub fn with_checks(mut self, checks: Vec<Box<dyn Check>>) -> Self {
        self.checks = checks;
        self
    }

    pub fn config(&self) -> &FederationConfig {
        &self.config
    }

    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// Merge `sources` into one workbook, then index and validate it
    ///
    /// `source_index` on removed rows is the zero-based position of the
    /// source in `sources`.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn merge(
        &self,
        sources: Vec<Workbook>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Workbook> {
        self.check_preconditions(&sources)?;

        let started = Instant::now();
        info!(
            sources = sources.len(),
            base = %self.config.indexing_base,
            "starting federation"
        );

        let excluded = &self.config.excluded_columns;
        let mut result = Workbook::new();
        let mut seen: HashMap<SheetKind, HashSet<String>> = HashMap::new();
        let mut progress = Progress::new(observer);

        for (source_index, source) in sources.into_iter().enumerate() {
            info!(source = source_index, sheets = source.len(), "merging workbook");

            for sheet in source.into_sheets() {
                let Some(kind) = sheet.kind() else {
                    warn!(
                        source = source_index,
                        sheet = sheet.name(),
                        rows = sheet.row_count(),
                        "dropping unregistered sheet"
                    );
                    continue;
                };
                let schema = kind.schema();
                let target = result.sheet_or_create(kind);

                if schema.single_copy_only && !target.is_empty() {
                    warn!(
                        source = source_index,
                        sheet = %kind,
                        "skipping sheet already supplied by an earlier workbook"
                    );
                    continue;
                }

                let (rows, carried) = sheet.into_parts();
                let carried_count = carried.len();
                for removed in carried {
                    target.push_removed_row(removed);
                }

                progress.initialise(
                    format!("Federate workbook {}, Merging {}", source_index + 1, kind),
                    rows.len(),
                    0,
                );

                let hashes = seen.entry(kind).or_default();
                let (mut retained, mut duplicates) = (0usize, 0usize);
                for mut row in rows {
                    progress.increment_and_update();
                    row.clear_hashes();

                    if schema.dedup_exempt {
                        target.push_row(row);
                        retained += 1;
                        continue;
                    }

                    let hash = fingerprint(&row, &schema, excluded);
                    if hashes.insert(hash.clone()) {
                        row.set_merge_hash(hash);
                        target.push_row(row);
                        retained += 1;
                    } else {
                        trace!(source = source_index, sheet = %kind, %hash, "duplicate row");
                        target.push_removed_row(RemovedRow {
                            row,
                            reason: RemovalReason::DuplicateOfRetained,
                            source_index,
                        });
                        duplicates += 1;
                    }
                }

                debug!(
                    source = source_index,
                    sheet = %kind,
                    retained,
                    duplicates,
                    carried = carried_count,
                    "merged sheet"
                );
            }
        }

        let snapshotted = snapshot_initial_hashes(&mut result, excluded);
        debug!(rows = snapshotted, "snapshotted initial hashes");

        self.populate_errors(&mut result, &mut progress);

        info!(
            sheets = result.len(),
            errors = result.error_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "federation finished"
        );
        Ok(result)
    }

    /// Rebuild indices and rerun the checks after rows were edited
    ///
    /// Returns the number of errors now attached.
    pub fn revalidate(&self, workbook: &mut Workbook, observer: &mut dyn ProgressObserver) -> usize {
        let mut progress = Progress::new(observer);
        self.populate_errors(workbook, &mut progress);
        workbook.error_count()
    }

    fn populate_errors(&self, workbook: &mut Workbook, progress: &mut Progress<'_>) {
        progress.initialise("Validating Workbooks", workbook.len(), 0);

        progress.report_message("Building Indices...");
        let indices = build_indices(workbook);
        progress.report_message("Building Indices...Finished");

        progress.report_message("Starting Validation...");
        validation::validate(
            workbook,
            &indices,
            &self.checks,
            self.config.indexing_base,
            |_| progress.increment_and_update(),
        );
        progress.report_message("Finished Validation");

        workbook.set_indices(indices);
        progress.finalise();
    }

    /// Structural checks over every source, before anything is merged
    fn check_preconditions(&self, sources: &[Workbook]) -> Result<()> {
        if sources.is_empty() {
            return Err(CobieError::precondition("no source workbooks supplied"));
        }
        self.config.validate()?;

        for (source_index, source) in sources.iter().enumerate() {
            for sheet in source.sheets() {
                let Some(schema) = sheet.schema() else {
                    match self.config.unknown_sheets {
                        UnknownSheetPolicy::Reject => {
                            return Err(CobieError::UnknownSheetKind(sheet.name().to_string()));
                        }
                        UnknownSheetPolicy::Drop => continue,
                    }
                };

                for (row_index, row) in sheet.rows().iter().enumerate() {
                    if row.len() != schema.column_count() {
                        return Err(CobieError::precondition(format!(
                            "workbook {} sheet {} row {}: expected {} cells, found {}",
                            source_index,
                            sheet.name(),
                            row_index,
                            schema.column_count(),
                            row.len()
                        )));
                    }
                    for (column, cell) in schema.columns.iter().zip(row.cells()) {
                        if !cell.fits(column.column_type) {
                            return Err(CobieError::precondition(format!(
                                "workbook {} sheet {} row {}: {} value in {:?} column {}",
                                source_index,
                                sheet.name(),
                                row_index,
                                cell.type_name(),
                                column.column_type,
                                column.name
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::progress::NoopObserver;
    use crate::workbook::{CellValue, Row, Sheet};

    fn floor(name: &str, description: &str) -> Row {
        let mut row = Row::empty(SheetKind::Floor.schema().column_count());
        row.set_cell(0, name.into());
        row.set_cell(3, "Floor".into());
        row.set_cell(7, description.into());
        row
    }

    fn workbook(sheets: Vec<Sheet>) -> Workbook {
        let mut workbook = Workbook::new();
        for sheet in sheets {
            workbook.add_sheet(sheet);
        }
        workbook
    }

    #[test]
    fn test_empty_source_list_is_rejected() {
        let federator = Federator::new(FederationConfig::default());
        let err = federator.merge(Vec::new(), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, CobieError::Precondition(_)));
    }

    #[test]
    fn test_row_width_mismatch_is_rejected() {
        let federator = Federator::new(FederationConfig::default());
        let source = workbook(vec![Sheet::with_rows("Floor", vec![Row::empty(2)])]);
        let err = federator.merge(vec![source], &mut NoopObserver).unwrap_err();
        assert!(err.to_string().contains("expected 10 cells, found 2"));
    }

    #[test]
    fn test_mistyped_cell_is_rejected() {
        let federator = Federator::new(FederationConfig::default());
        let mut row = floor("Level 1", "");
        row.set_cell(8, "high".into());
        let source = workbook(vec![Sheet::with_rows("Floor", vec![row])]);
        let err = federator.merge(vec![source], &mut NoopObserver).unwrap_err();
        assert!(matches!(err, CobieError::Precondition(ref msg) if msg.contains("Elevation")));
    }

    #[test]
    fn test_merge_hash_is_set_on_retained_rows() {
        let federator = Federator::new(FederationConfig::default());
        let source = workbook(vec![Sheet::with_rows("Floor", vec![floor("Level 1", "")])]);
        let result = federator.merge(vec![source], &mut NoopObserver).unwrap();

        let row = &result.sheet("Floor").unwrap().rows()[0];
        let expected = fingerprint(row, &SheetKind::Floor.schema(), &[]);
        assert_eq!(row.merge_hash(), Some(expected.as_str()));
        assert_eq!(row.initial_hash(), Some(expected.as_str()));
    }

    #[test]
    fn test_excluded_columns_widen_duplicates() {
        let config = FederationConfig::default().with_excluded_columns(["Description"]);
        let federator = Federator::new(config);
        let a = workbook(vec![Sheet::with_rows("Floor", vec![floor("Level 1", "north")])]);
        let b = workbook(vec![Sheet::with_rows("Floor", vec![floor("Level 1", "south")])]);

        let result = federator.merge(vec![a, b], &mut NoopObserver).unwrap();
        let sheet = result.sheet("Floor").unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.removed_rows().len(), 1);
        assert_eq!(
            sheet.rows()[0].cell(7),
            Some(&CellValue::text("north"))
        );
    }

    #[test]
    fn test_revalidate_after_edit() {
        let federator = Federator::with_default_checks(FederationConfig::default());
        let source = workbook(vec![Sheet::with_rows("Floor", vec![floor("Level 1", "")])]);
        let mut result = federator.merge(vec![source], &mut NoopObserver).unwrap();
        assert_eq!(result.error_count(), 0);

        result
            .sheet_mut("Floor")
            .unwrap()
            .row_mut(0)
            .unwrap()
            .set_cell(3, CellValue::Empty);
        assert_eq!(federator.revalidate(&mut result, &mut NoopObserver), 1);
        assert_eq!(result.sheet("Floor").unwrap().changed_rows(&[]), vec![0]);
    }
}
