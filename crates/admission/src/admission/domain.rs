use serde::{Deserialize, Serialize};

/// Composite identity of an applicant record: at most one record may exist
/// per `(name, program)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantKey {
    pub name: String,
    pub program: String,
}

/// A candidate's submitted score record for one program.
///
/// `date_submitted` is kept as the ISO string the importer produced. The
/// historical aggregator groups by exact string equality, so no date
/// normalization happens after import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub program: String,
    pub total_score: f64,
    pub priority: u32,
    pub date_submitted: String,
}

impl Applicant {
    pub fn key(&self) -> ApplicantKey {
        ApplicantKey {
            name: self.name.clone(),
            program: self.program.clone(),
        }
    }
}

/// An academic track with a fixed admission quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Short code used in upload filenames (e.g. `pm_01.csv`).
    pub code: String,
    pub name: String,
    pub budget_places: u32,
}

/// Admission outcome classification relative to the budget quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Admitted,
    Borderline,
    NotAdmitted,
}

impl AdmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AdmissionStatus::Admitted => "admitted",
            AdmissionStatus::Borderline => "borderline",
            AdmissionStatus::NotAdmitted => "not_admitted",
        }
    }
}

/// An applicant annotated with its position in the program ranking.
///
/// Derived on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    /// 1-based position within the program's score-sorted list.
    pub rank: u32,
    /// Admission probability in percent, 0..=100.
    pub probability: u8,
    pub status: AdmissionStatus,
}

/// Full ranking view for one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRanking {
    pub program: String,
    pub budget_places: u32,
    /// Score of the last admitted applicant under the quota; `None` when
    /// fewer applicants than budget places exist (rendered as "N/A").
    pub passing_score: Option<f64>,
    pub applicants: Vec<RankedApplicant>,
}

/// A program's applicants submitted on one date, for trend displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBucket {
    pub date: String,
    pub applicants: Vec<Applicant>,
}

/// Row-level failure detail carried in reconciliation reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub index: usize,
    pub reason: String,
}

/// Outcome of one reconciliation batch.
///
/// Imports abort on the first malformed row, so `failed_rows` is empty on
/// success; the field mirrors the report shape consumed by presentation
/// layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failed_rows: Vec<RowFailure>,
}
