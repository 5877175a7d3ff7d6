//! Applicant ranking and CSV reconciliation for university programs.
//!
//! The applicant store is the single mutable resource: the reconciler
//! writes to it in atomic batches, while the ranking engine and the
//! historical aggregator only read snapshots.

pub mod domain;
pub mod history;
pub mod import;
pub mod ranking;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{
    AdmissionStatus, Applicant, ApplicantKey, HistoricalBucket, Program, ProgramRanking,
    RankedApplicant, ReconciliationSummary, RowFailure,
};
pub use import::{CsvReconciler, ImportContext, ReconciliationError, UNKNOWN_PROGRAM};
pub use router::{admission_router, ImportRequest, ReconcileRequest};
pub use service::{AdmissionError, AdmissionService};
pub use store::{
    ApplicantStore, BatchOutcome, InMemoryApplicantStore, ProgramCatalog, ReconciliationBatch,
    StoreError,
};
