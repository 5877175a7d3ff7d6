//! Core crate for the admission ranking service: applicant storage, CSV
//! reconciliation, ranking with admission probabilities, and historical
//! aggregation, plus the shared configuration, telemetry, and error
//! plumbing used by the HTTP/CLI front end.

pub mod admission;
pub mod config;
pub mod error;
pub mod telemetry;
