use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::Applicant;
use super::import::{ImportContext, ReconciliationError};
use super::service::{AdmissionError, AdmissionService};
use super::store::ApplicantStore;

/// Router builder exposing HTTP endpoints for listing, ranking, history,
/// and reconciliation.
pub fn admission_router<S>(service: Arc<AdmissionService<S>>) -> Router
where
    S: ApplicantStore + 'static,
{
    Router::new()
        .route("/api/v1/programs", get(programs_handler::<S>))
        .route("/api/v1/applicants", get(list_all_handler::<S>))
        .route("/api/v1/applicants/:program", get(list_program_handler::<S>))
        .route(
            "/api/v1/programs/:program/ranking",
            get(ranking_handler::<S>),
        )
        .route(
            "/api/v1/programs/:program/history",
            get(history_handler::<S>),
        )
        .route("/api/v1/imports", post(import_handler::<S>))
        .route(
            "/api/v1/applicants/reconcile",
            post(reconcile_handler::<S>),
        )
        .with_state(service)
}

/// CSV upload payload. The transport hands the core the raw sheet text plus
/// the original filename so program and date inference stay in one place.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub csv: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub full_sync: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub applicants: Vec<Applicant>,
    #[serde(default)]
    pub prune_missing: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    date: Option<String>,
}

pub(crate) async fn programs_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    (StatusCode::OK, axum::Json(service.programs())).into_response()
}

pub(crate) async fn list_all_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match service.applicants(None) {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_program_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(program): Path<String>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match service.applicants(Some(&program)) {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ranking_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(program): Path<String>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match service.ranking(&program) {
        Ok(ranking) => (StatusCode::OK, axum::Json(ranking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(program): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match service.history(&program, query.date.as_deref()) {
        Ok(buckets) => (StatusCode::OK, axum::Json(buckets)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    let context = ImportContext {
        filename: request.filename,
        program_override: request.program,
        fallback_date: None,
        full_sync: request.full_sync,
    };

    match service.import_csv(Cursor::new(request.csv.into_bytes()), &context) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reconcile_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    axum::Json(request): axum::Json<ReconcileRequest>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match service.reconcile_applicants(request.applicants, request.prune_missing) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map each error-taxonomy entry to a distinct response category. A failed
/// reconciliation never reports success counts.
fn error_response(error: AdmissionError) -> Response {
    let status = match &error {
        AdmissionError::ProgramNotFound(_) => StatusCode::NOT_FOUND,
        AdmissionError::Reconciliation(ReconciliationError::MalformedRow { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AdmissionError::Reconciliation(ReconciliationError::Csv(_)) => StatusCode::BAD_REQUEST,
        AdmissionError::Reconciliation(ReconciliationError::Conflict(_))
        | AdmissionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
