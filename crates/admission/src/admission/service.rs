use std::io::Read;
use std::sync::Arc;

use tracing::debug;

use super::domain::{
    Applicant, ApplicantKey, HistoricalBucket, Program, ProgramRanking, ReconciliationSummary,
};
use super::history;
use super::import::{CsvReconciler, ImportContext, ReconciliationError};
use super::ranking;
use super::store::{ApplicantStore, ProgramCatalog, StoreError};

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    /// Ranking or history requested for a program outside the catalog.
    #[error("program not found: {0}")]
    ProgramNotFound(String),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Facade composing the applicant store, program catalog, and reconciler.
///
/// The store is the only mutable resource; ranking and history queries work
/// on snapshots and never write back.
pub struct AdmissionService<S> {
    store: Arc<S>,
    catalog: Arc<ProgramCatalog>,
    reconciler: CsvReconciler<S>,
}

impl<S: ApplicantStore> AdmissionService<S> {
    pub fn new(store: Arc<S>, catalog: ProgramCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let reconciler = CsvReconciler::new(store.clone(), catalog.clone());
        Self {
            store,
            catalog,
            reconciler,
        }
    }

    pub fn catalog(&self) -> &ProgramCatalog {
        &self.catalog
    }

    pub fn programs(&self) -> Vec<Program> {
        self.catalog.programs().to_vec()
    }

    /// Stored applicants, either for one program (ranking order) or across
    /// all programs (program name, then ranking order).
    pub fn applicants(&self, program: Option<&str>) -> Result<Vec<Applicant>, AdmissionError> {
        let snapshot = match program {
            Some(program) => self.store.snapshot_program(program)?,
            None => self.store.snapshot_all()?,
        };
        Ok(snapshot)
    }

    /// Rank a program's applicants against its quota.
    pub fn ranking(&self, program: &str) -> Result<ProgramRanking, AdmissionError> {
        let budget_places = self
            .catalog
            .budget_places(program)
            .ok_or_else(|| AdmissionError::ProgramNotFound(program.to_string()))?;

        let snapshot = self.store.snapshot_program(program)?;
        let applicants = ranking::rank_applicants(snapshot, budget_places);
        let passing_score = ranking::passing_score(&applicants, budget_places);

        debug!(
            program,
            budget_places,
            applicants = applicants.len(),
            "ranking computed"
        );

        Ok(ProgramRanking {
            program: program.to_string(),
            budget_places,
            passing_score,
            applicants,
        })
    }

    /// Chronological submission-date series for a program, optionally
    /// narrowed to one exact date value.
    pub fn history(
        &self,
        program: &str,
        date: Option<&str>,
    ) -> Result<Vec<HistoricalBucket>, AdmissionError> {
        if self.catalog.budget_places(program).is_none() {
            return Err(AdmissionError::ProgramNotFound(program.to_string()));
        }

        let snapshot = self.store.snapshot_program(program)?;
        let mut buckets = history::group_by_date(snapshot);
        if let Some(date) = date {
            buckets.retain(|bucket| bucket.date == date);
        }
        Ok(buckets)
    }

    /// Import an uploaded CSV score sheet.
    pub fn import_csv<R: Read>(
        &self,
        reader: R,
        context: &ImportContext,
    ) -> Result<ReconciliationSummary, AdmissionError> {
        Ok(self.reconciler.import(reader, context)?)
    }

    /// Reconcile already-typed applicant records against the store.
    pub fn reconcile_applicants(
        &self,
        applicants: Vec<Applicant>,
        prune_missing: bool,
    ) -> Result<ReconciliationSummary, AdmissionError> {
        Ok(self.reconciler.reconcile(applicants, prune_missing)?)
    }

    /// Delete stored applicants whose pair is absent from the given set.
    pub fn prune_to(
        &self,
        retain: Vec<ApplicantKey>,
    ) -> Result<ReconciliationSummary, AdmissionError> {
        Ok(self.reconciler.prune(retain)?)
    }
}
