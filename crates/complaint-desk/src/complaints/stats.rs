use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::domain::Status;
use super::query::ComplaintQuery;
use super::repository::{ComplaintRepository, RepositoryError};

/// Read-only aggregations over the complaint collection. Every call issues
/// its own point-in-time read and scans the full collection; the combined
/// snapshot is therefore not transactionally consistent under concurrent
/// writes.
pub struct StatsService<R> {
    repository: Arc<R>,
}

/// Chart-ready label/count pair lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

impl Distribution {
    fn from_entries(entries: Vec<(&'static str, u64)>) -> Self {
        let mut distribution = Self::default();
        for (label, count) in entries {
            distribution.labels.push(label.to_string());
            distribution.data.push(count);
        }
        distribution
    }

    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

/// The combined statistics payload served at `/stats/all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: u64,
    pub pending: u64,
    pub resolved: u64,
    pub category_distribution: Distribution,
    pub status_distribution: Distribution,
}

impl<R> StatsService<R>
where
    R: ComplaintRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn total(&self) -> Result<u64, RepositoryError> {
        self.repository.count(&ComplaintQuery::default())
    }

    pub fn count_by_status(&self, status: Status) -> Result<u64, RepositoryError> {
        self.repository.count(&ComplaintQuery::with_status(status))
    }

    /// Counts per category present, largest first (label order breaks ties so
    /// the output is deterministic).
    pub fn category_distribution(&self) -> Result<Distribution, RepositoryError> {
        let mut entries = self.grouped(|complaint| complaint.category.label())?;
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Ok(Distribution::from_entries(entries))
    }

    /// Counts per status present. No ordering guarantee.
    pub fn status_distribution(&self) -> Result<Distribution, RepositoryError> {
        let entries = self.grouped(|complaint| complaint.status.label())?;
        Ok(Distribution::from_entries(entries))
    }

    /// Total, pending, resolved, and both distributions, each computed from
    /// its own independent read.
    pub fn all(&self) -> Result<StatsSnapshot, RepositoryError> {
        Ok(StatsSnapshot {
            total: self.total()?,
            pending: self.count_by_status(Status::Pending)?,
            resolved: self.count_by_status(Status::Resolved)?,
            category_distribution: self.category_distribution()?,
            status_distribution: self.status_distribution()?,
        })
    }

    fn grouped(
        &self,
        key: fn(&super::domain::Complaint) -> &'static str,
    ) -> Result<Vec<(&'static str, u64)>, RepositoryError> {
        let complaints = self.repository.find(&ComplaintQuery::default())?;
        let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();
        for complaint in &complaints {
            *counts.entry(key(complaint)).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
