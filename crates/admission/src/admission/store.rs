use std::collections::HashSet;
use std::sync::RwLock;

use super::domain::{Applicant, ApplicantKey, Program};
use super::ranking::sort_for_ranking;

/// Seed catalog installed at process start. Codes drive filename-based
/// program inference during CSV import.
const SEED_PROGRAMS: [(&str, &str, u32); 3] = [
    ("pm", "Applied Mathematics", 40),
    ("ivt", "Computer Science and Engineering", 50),
    ("itss", "Infocommunication Technologies and Communication Systems", 30),
];

/// Read-only set of known programs and their admission quotas.
///
/// Constructed once at startup; administrative mutation is out of scope.
#[derive(Debug, Clone)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
}

impl ProgramCatalog {
    /// Catalog with the fixed seed list of programs.
    pub fn seed() -> Self {
        let programs = SEED_PROGRAMS
            .iter()
            .map(|(code, name, budget_places)| Program {
                code: (*code).to_string(),
                name: (*name).to_string(),
                budget_places: *budget_places,
            })
            .collect();
        Self { programs }
    }

    /// Catalog over an explicit program list, for tests and embedders.
    pub fn with_programs(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn budget_places(&self, name: &str) -> Option<u32> {
        self.programs
            .iter()
            .find(|program| program.name == name)
            .map(|program| program.budget_places)
    }

    pub fn by_code(&self, code: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.code == code)
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("applicant store unavailable: {0}")]
    Unavailable(String),
}

/// One atomic unit of store mutation.
///
/// Upserts are applied in order; when `retain` is present, every stored
/// record whose key is absent from the set is deleted in the same unit.
/// The retain set governs the whole store, not a single program.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationBatch {
    pub upserts: Vec<Applicant>,
    pub retain: Option<Vec<ApplicantKey>>,
}

/// Counts produced by applying one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Storage abstraction for applicant records.
///
/// Readers only ever observe fully applied batches: `apply` either commits
/// every change or leaves the store exactly as it was.
pub trait ApplicantStore: Send + Sync {
    /// Applicants for one program in ranking order (score desc, priority asc,
    /// insertion order as the final tiebreak).
    fn snapshot_program(&self, program: &str) -> Result<Vec<Applicant>, StoreError>;

    /// All applicants ordered by program name, then ranking order.
    fn snapshot_all(&self) -> Result<Vec<Applicant>, StoreError>;

    /// Apply a batch of upserts and optional retain-set deletes atomically.
    fn apply(&self, batch: ReconciliationBatch) -> Result<BatchOutcome, StoreError>;
}

/// In-memory store backing the service and tests.
///
/// Records live in insertion order, which `sort_for_ranking` relies on for
/// its stable tiebreak.
#[derive(Debug, Default)]
pub struct InMemoryApplicantStore {
    entries: RwLock<Vec<Applicant>>,
}

impl InMemoryApplicantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicantStore for InMemoryApplicantStore {
    fn snapshot_program(&self, program: &str) -> Result<Vec<Applicant>, StoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        let mut snapshot: Vec<Applicant> = guard
            .iter()
            .filter(|entry| entry.program == program)
            .cloned()
            .collect();
        sort_for_ranking(&mut snapshot);
        Ok(snapshot)
    }

    fn snapshot_all(&self) -> Result<Vec<Applicant>, StoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        let mut snapshot = guard.clone();
        snapshot.sort_by(|a, b| {
            a.program
                .cmp(&b.program)
                .then_with(|| b.total_score.total_cmp(&a.total_score))
                .then_with(|| a.priority.cmp(&b.priority))
        });
        Ok(snapshot)
    }

    fn apply(&self, batch: ReconciliationBatch) -> Result<BatchOutcome, StoreError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        // Mutate a scratch copy and swap at the end so a failure can never
        // leave a partially applied batch visible.
        let mut next = guard.clone();
        let mut outcome = BatchOutcome::default();

        for applicant in batch.upserts {
            let position = next
                .iter()
                .position(|entry| entry.name == applicant.name && entry.program == applicant.program);
            match position {
                Some(index) => {
                    next[index] = applicant;
                    outcome.updated += 1;
                }
                None => {
                    next.push(applicant);
                    outcome.inserted += 1;
                }
            }
        }

        if let Some(retain) = batch.retain {
            let keep: HashSet<ApplicantKey> = retain.into_iter().collect();
            let before = next.len();
            next.retain(|entry| keep.contains(&entry.key()));
            outcome.deleted = before - next.len();
        }

        *guard = next;
        Ok(outcome)
    }
}
