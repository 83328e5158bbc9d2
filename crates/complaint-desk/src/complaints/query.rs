use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{Category, Complaint, Priority, Status, UserId, ValidationError};

/// Optional filter parameters exactly as they arrive on the query string.
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ComplaintFilter {
    /// Parse the raw filters into a typed query, collecting every
    /// unparseable field into one `ValidationError`.
    pub fn into_query(self) -> Result<ComplaintQuery, ValidationError> {
        let mut errors = ValidationError::default();

        let category = parse_field(
            self.category,
            Category::parse,
            "category",
            "Invalid category",
            &mut errors,
        );
        let priority = parse_field(
            self.priority,
            Priority::parse,
            "priority",
            "Invalid priority",
            &mut errors,
        );
        let status = parse_field(
            self.status,
            Status::parse,
            "status",
            "Invalid status",
            &mut errors,
        );

        let filed_on = match present(self.date) {
            None => None,
            Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(day) => Some(day),
                Err(_) => {
                    errors.push("date", "Invalid date");
                    None
                }
            },
        };

        let search = present(self.search);

        errors.into_result()?;
        Ok(ComplaintQuery {
            owner: None,
            category,
            priority,
            status,
            filed_on,
            search,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_field<T>(
    raw: Option<String>,
    parse: fn(&str) -> Option<T>,
    field: &'static str,
    message: &'static str,
    errors: &mut ValidationError,
) -> Option<T> {
    match present(raw) {
        None => None,
        Some(value) => match parse(&value) {
            Some(parsed) => Some(parsed),
            None => {
                errors.push(field, message);
                None
            }
        },
    }
}

/// Typed query handed to the repository. All set fields combine with logical
/// AND; the owner field is how the service enforces non-admin scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintQuery {
    pub owner: Option<UserId>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// Calendar-day match against the filing date. The stored `date` is the
    /// server-local filing day, so equality here covers 00:00:00.000 through
    /// 23:59:59.999 of that day.
    pub filed_on: Option<NaiveDate>,
    /// Case-insensitive substring match over the description.
    pub search: Option<String>,
}

impl ComplaintQuery {
    pub fn for_owner(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Predicate form used by in-memory adapters; a document store translates
    /// the same fields into its native query language.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(owner) = &self.owner {
            if &complaint.owner_id != owner {
                return false;
            }
        }
        if let Some(category) = self.category {
            if complaint.category != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if complaint.priority != priority {
                return false;
            }
        }
        if let Some(status) = self.status {
            if complaint.status != status {
                return false;
            }
        }
        if let Some(filed_on) = self.filed_on {
            if complaint.date != filed_on {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let haystack = complaint.description.to_lowercase();
            if !haystack.contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
