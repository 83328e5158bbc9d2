//! Complaint intake, triage, statistics, and export.
//!
//! The data model and validation live in [`domain`], filter-query
//! construction in [`query`], and the storage/identity seams in
//! [`repository`] and [`auth`]. [`service`], [`stats`], and [`export`] carry
//! the operations; [`router`] exposes them over HTTP.

pub mod auth;
pub mod domain;
pub mod export;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use auth::{authenticate, bearer_token, require_admin, AuthError, GateError, IdentityResolver};
pub use domain::{
    Actor, Category, Complaint, ComplaintContent, ComplaintDraft, ComplaintId, ComplaintView,
    FieldError, Priority, Role, Status, UserId, UserProfile, ValidationError,
    MIN_DESCRIPTION_CHARS,
};
pub use export::{to_csv, ExportError, ExportRow, EXPORT_HEADERS};
pub use query::{ComplaintFilter, ComplaintQuery};
pub use repository::{ComplaintRepository, DirectoryError, RepositoryError, UserDirectory};
pub use router::{complaint_router, ComplaintApi};
pub use service::{ComplaintService, ComplaintServiceError};
pub use stats::{Distribution, StatsService, StatsSnapshot};
