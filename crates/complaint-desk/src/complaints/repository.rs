use super::domain::{Complaint, ComplaintId, UserId, UserProfile};
use super::query::ComplaintQuery;

/// Storage abstraction over the complaint collection so the services can be
/// exercised in isolation. The backing document store is an external
/// collaborator with at least read-committed semantics; `update` replaces the
/// whole record, so concurrent writers are last-writer-wins.
pub trait ComplaintRepository: Send + Sync {
    fn insert(&self, complaint: Complaint) -> Result<Complaint, RepositoryError>;
    fn fetch(&self, id: &ComplaintId) -> Result<Option<Complaint>, RepositoryError>;
    fn update(&self, complaint: Complaint) -> Result<(), RepositoryError>;
    /// Every complaint matching `query`, newest first by creation time.
    fn find(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>, RepositoryError>;
    fn count(&self, query: &ComplaintQuery) -> Result<u64, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of user contact details. User records live with the
/// external auth service; this core only ever resolves id -> profile for
/// response population and CSV export.
pub trait UserDirectory: Send + Sync {
    fn lookup(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError>;
}

/// Directory lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}
