use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, Utc};

use super::domain::{
    Actor, Complaint, ComplaintDraft, ComplaintId, Status, ValidationError,
};
use super::query::ComplaintFilter;
use super::repository::{ComplaintRepository, RepositoryError};

static COMPLAINT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_complaint_id() -> ComplaintId {
    let id = COMPLAINT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ComplaintId(format!("cmp-{id:06}"))
}

/// Core complaint lifecycle: intake, scoped listing, single-record access,
/// and the administrative status update.
pub struct ComplaintService<R> {
    repository: Arc<R>,
}

impl<R> ComplaintService<R>
where
    R: ComplaintRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// File a new complaint for `actor`. Every invalid field is reported in a
    /// single `ValidationError`; on success the record is persisted with
    /// status `Pending`, today's filing date, and the actor as owner.
    pub fn submit(
        &self,
        actor: &Actor,
        draft: ComplaintDraft,
    ) -> Result<Complaint, ComplaintServiceError> {
        let content = draft.validate()?;

        let complaint = Complaint {
            id: next_complaint_id(),
            category: content.category,
            description: content.description,
            priority: content.priority,
            status: Status::Pending,
            date: Local::now().date_naive(),
            created_at: Utc::now(),
            owner_id: actor.id.clone(),
        };

        Ok(self.repository.insert(complaint)?)
    }

    /// Complaints visible to `actor`, newest first. Non-admin actors are
    /// implicitly scoped to their own records; admins see everything unless
    /// the filters narrow further.
    pub fn list(
        &self,
        actor: &Actor,
        filter: ComplaintFilter,
    ) -> Result<Vec<Complaint>, ComplaintServiceError> {
        let mut query = filter.into_query()?;
        if !actor.role.is_admin() {
            query.owner = Some(actor.id.clone());
        }
        Ok(self.repository.find(&query)?)
    }

    /// The actor's own complaints, newest first. Owner-scoped even for
    /// admins; this backs the `/complaints/my` listing.
    pub fn list_own(
        &self,
        actor: &Actor,
        filter: ComplaintFilter,
    ) -> Result<Vec<Complaint>, ComplaintServiceError> {
        let mut query = filter.into_query()?;
        query.owner = Some(actor.id.clone());
        Ok(self.repository.find(&query)?)
    }

    /// Fetch one complaint, readable by its owner or any admin.
    pub fn get(&self, actor: &Actor, id: &ComplaintId) -> Result<Complaint, ComplaintServiceError> {
        let complaint = self
            .repository
            .fetch(id)?
            .ok_or(ComplaintServiceError::NotFound)?;

        if !actor.role.is_admin() && complaint.owner_id != actor.id {
            return Err(ComplaintServiceError::Forbidden);
        }

        Ok(complaint)
    }

    /// Move a complaint to `raw_status`. Requires an admin actor regardless
    /// of upstream gating. Last writer wins; no history is kept.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &ComplaintId,
        raw_status: &str,
    ) -> Result<Complaint, ComplaintServiceError> {
        if !actor.role.is_admin() {
            return Err(ComplaintServiceError::Forbidden);
        }

        let status = Status::parse(raw_status)
            .ok_or_else(|| ValidationError::single("status", "Invalid status"))?;

        let mut complaint = self
            .repository
            .fetch(id)?
            .ok_or(ComplaintServiceError::NotFound)?;
        complaint.status = status;
        self.repository.update(complaint.clone())?;

        Ok(complaint)
    }
}

/// Error raised by the complaint service, one variant per taxonomy entry the
/// HTTP layer maps to a status code.
#[derive(Debug, thiserror::Error)]
pub enum ComplaintServiceError {
    #[error("Validation failed")]
    Validation(#[from] ValidationError),
    #[error("Not authorized to access this complaint")]
    Forbidden,
    #[error("Complaint not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
