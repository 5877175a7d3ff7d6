use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use admission::admission::{AdmissionService, InMemoryApplicantStore, ProgramCatalog};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the service over a fresh in-memory store and the seed catalog.
/// The store handle is constructed once here and threaded into every
/// component; nothing reaches for process-global state.
pub(crate) fn build_admission_service() -> Arc<AdmissionService<InMemoryApplicantStore>> {
    let store = Arc::new(InMemoryApplicantStore::new());
    Arc::new(AdmissionService::new(store, ProgramCatalog::seed()))
}
