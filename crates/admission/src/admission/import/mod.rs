//! CSV import and store reconciliation.
//!
//! Imports are whole-batch atomic: the first malformed row aborts the
//! import with its row index and the store is left exactly as it was.
//! In full-sync mode the parsed rows double as the authoritative pair
//! set, and every stored record absent from it is deleted in the same
//! atomic batch. That set governs the whole store, so full-sync is meant
//! for complete result exports, not single-program sheets.

pub(crate) mod filename;
mod parser;

use std::io::Read;
use std::sync::Arc;

use chrono::Local;
use tracing::info;

use super::domain::{Applicant, ApplicantKey, ReconciliationSummary};
use super::store::{ApplicantStore, BatchOutcome, ProgramCatalog, ReconciliationBatch, StoreError};

pub use filename::FilenameHints;

/// Program used when neither the request, the row, nor the filename names
/// one.
pub const UNKNOWN_PROGRAM: &str = "Unknown Program";

/// Error enumeration for reconciliation failures.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// A numeric field failed to parse; the whole import is aborted.
    #[error("row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    /// The atomic batch could not be applied; the store is unchanged and
    /// no counts were produced.
    #[error("reconciliation aborted, store unchanged: {0}")]
    Conflict(#[from] StoreError),
}

/// Per-import resolution context supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    /// Original upload filename, mined for program and date hints.
    pub filename: Option<String>,
    /// Explicit program override; beats row values and filename hints.
    pub program_override: Option<String>,
    /// Date used when neither the row nor the filename carries one.
    /// Defaults to today.
    pub fallback_date: Option<String>,
    /// Treat the parsed rows as the authoritative applicant set and delete
    /// stored records absent from it.
    pub full_sync: bool,
}

/// Parses uploaded score sheets and reconciles them against the store.
pub struct CsvReconciler<S> {
    store: Arc<S>,
    catalog: Arc<ProgramCatalog>,
}

impl<S: ApplicantStore> CsvReconciler<S> {
    pub fn new(store: Arc<S>, catalog: Arc<ProgramCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Import a CSV score sheet as one atomic batch of upserts (plus
    /// deletes in full-sync mode).
    pub fn import<R: Read>(
        &self,
        reader: R,
        context: &ImportContext,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        let rows = parser::parse_rows(reader)?;

        let hints = context
            .filename
            .as_deref()
            .map(|name| filename::infer(name, &self.catalog))
            .unwrap_or_default();
        let fallback_date = context
            .fallback_date
            .clone()
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

        let mut applicants = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let total_score = parser::parse_score(index, &row.total_score)?;
            let priority = parser::parse_priority(index, &row.priority)?;

            let program = context
                .program_override
                .clone()
                .or(row.program)
                .or_else(|| hints.program.clone())
                .unwrap_or_else(|| UNKNOWN_PROGRAM.to_string());
            let date_submitted = row
                .date_submitted
                .or_else(|| hints.date.clone())
                .unwrap_or_else(|| fallback_date.clone());

            applicants.push(Applicant {
                name: row.name,
                program,
                total_score,
                priority,
                date_submitted,
            });
        }

        self.commit(applicants, context.full_sync)
    }

    /// Reconcile already-typed applicant records, optionally pruning stored
    /// records whose `(name, program)` pair is absent from the input.
    pub fn reconcile(
        &self,
        applicants: Vec<Applicant>,
        prune_missing: bool,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        self.commit(applicants, prune_missing)
    }

    /// Delete-only sync against an authoritative pair list.
    pub fn prune(
        &self,
        retain: Vec<ApplicantKey>,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        let outcome = self.store.apply(ReconciliationBatch {
            upserts: Vec::new(),
            retain: Some(retain),
        })?;
        Ok(summary_from(outcome))
    }

    fn commit(
        &self,
        applicants: Vec<Applicant>,
        full_sync: bool,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        let retain = full_sync.then(|| applicants.iter().map(Applicant::key).collect());
        let outcome = self.store.apply(ReconciliationBatch {
            upserts: applicants,
            retain,
        })?;

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            deleted = outcome.deleted,
            full_sync,
            "reconciliation applied"
        );

        Ok(summary_from(outcome))
    }
}

fn summary_from(outcome: BatchOutcome) -> ReconciliationSummary {
    ReconciliationSummary {
        inserted: outcome.inserted,
        updated: outcome.updated,
        deleted: outcome.deleted,
        failed_rows: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::InMemoryApplicantStore;
    use super::*;
    use std::io::Cursor;

    fn reconciler() -> (Arc<InMemoryApplicantStore>, CsvReconciler<InMemoryApplicantStore>) {
        let store = Arc::new(InMemoryApplicantStore::new());
        let catalog = Arc::new(ProgramCatalog::seed());
        (store.clone(), CsvReconciler::new(store, catalog))
    }

    fn context_for(filename: &str) -> ImportContext {
        ImportContext {
            filename: Some(filename.to_string()),
            ..ImportContext::default()
        }
    }

    #[test]
    fn import_resolves_program_and_date_from_filename() {
        let (store, reconciler) = reconciler();
        let summary = reconciler
            .import(
                Cursor::new("name,total_score,priority\nIvanov,250.5,1\n"),
                &context_for("pm_02.csv"),
            )
            .expect("import");

        assert_eq!(summary.inserted, 1);
        let snapshot = store
            .snapshot_program("Applied Mathematics")
            .expect("snapshot");
        assert_eq!(snapshot[0].date_submitted, "2023-08-02");
    }

    #[test]
    fn override_beats_row_and_filename_program() {
        let (store, reconciler) = reconciler();
        let context = ImportContext {
            filename: Some("pm_02.csv".to_string()),
            program_override: Some("Computer Science and Engineering".to_string()),
            ..ImportContext::default()
        };
        reconciler
            .import(
                Cursor::new(
                    "name,total_score,priority,program\nIvanov,250.5,1,Applied Mathematics\n",
                ),
                &context,
            )
            .expect("import");

        assert_eq!(
            store
                .snapshot_program("Computer Science and Engineering")
                .expect("snapshot")
                .len(),
            1
        );
    }

    #[test]
    fn unresolvable_program_falls_back_to_literal() {
        let (store, reconciler) = reconciler();
        let context = ImportContext {
            fallback_date: Some("2023-08-01".to_string()),
            ..ImportContext::default()
        };
        reconciler
            .import(
                Cursor::new("name,total_score,priority\nIvanov,250.5,1\n"),
                &context,
            )
            .expect("import");

        let snapshot = store.snapshot_program(UNKNOWN_PROGRAM).expect("snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].date_submitted, "2023-08-01");
    }

    #[test]
    fn malformed_score_aborts_with_row_index_and_store_untouched() {
        let (store, reconciler) = reconciler();
        let error = reconciler
            .import(
                Cursor::new(
                    "name,total_score,priority\nIvanov,250.5,1\nPetrov,not-a-score,2\n",
                ),
                &context_for("pm_02.csv"),
            )
            .expect_err("malformed");

        match error {
            ReconciliationError::MalformedRow { index, .. } => assert_eq!(index, 1),
            other => panic!("expected malformed row, got {other:?}"),
        }
        assert!(store.snapshot_all().expect("snapshot").is_empty());
    }

    #[test]
    fn full_sync_import_prunes_absent_pairs() {
        let (store, reconciler) = reconciler();
        reconciler
            .import(
                Cursor::new("name,total_score,priority\nIvanov,250.5,1\nPetrov,240,1\n"),
                &context_for("pm_02.csv"),
            )
            .expect("seed import");

        let context = ImportContext {
            full_sync: true,
            ..context_for("pm_03.csv")
        };
        let summary = reconciler
            .import(
                Cursor::new("name,total_score,priority\nIvanov,251,1\n"),
                &context,
            )
            .expect("sync import");

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(
            store
                .snapshot_program("Applied Mathematics")
                .expect("snapshot")
                .len(),
            1
        );
    }

    #[test]
    fn prune_with_empty_set_clears_the_store() {
        let (store, reconciler) = reconciler();
        reconciler
            .import(
                Cursor::new("name,total_score,priority\nIvanov,250.5,1\n"),
                &context_for("pm_02.csv"),
            )
            .expect("seed import");

        let summary = reconciler.prune(Vec::new()).expect("prune");
        assert_eq!(summary.deleted, 1);
        assert!(store.snapshot_all().expect("snapshot").is_empty());
    }
}
