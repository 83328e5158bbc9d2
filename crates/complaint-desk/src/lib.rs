//! Core library for the complaint desk service.
//!
//! The `complaints` module carries the data model, validation, authorization
//! predicates, filter-query construction, and the complaint/statistics/export
//! services behind storage and identity abstractions, plus the HTTP router
//! that exposes them. `config`, `telemetry`, and `error` cover the runtime
//! scaffolding the service binary needs.

pub mod complaints;
pub mod config;
pub mod error;
pub mod telemetry;
