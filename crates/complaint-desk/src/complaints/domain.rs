use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minimum complaint description length, counted after trimming whitespace.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Identifier wrapper for stored complaints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub String);

impl ComplaintId {
    /// Short presentation id: `#` plus the last three characters of the
    /// internal id, left-padded with zeros to width three. Collisions are
    /// tolerated; lookups always go through the full id.
    pub fn display(&self) -> String {
        let len = self.0.chars().count();
        let tail: String = self.0.chars().skip(len.saturating_sub(3)).collect();
        format!("#{tail:0>3}")
    }
}

/// Identifier for the filing user, owned by the external auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Closed complaint taxonomy shown in the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technical,
    Billing,
    Service,
    Infrastructure,
    Other,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Billing => "Billing",
            Category::Service => "Service",
            Category::Infrastructure => "Infrastructure",
            Category::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Technical" => Some(Category::Technical),
            "Billing" => Some(Category::Billing),
            "Service" => Some(Category::Service),
            "Infrastructure" => Some(Category::Infrastructure),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// Urgency attached by the filer; defaults to `Medium` when omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Triage state. Transitions are unrestricted among the three states but go
/// exclusively through the administrative update operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Status {
    pub const fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Status::Pending),
            "In Progress" => Some(Status::InProgress),
            "Resolved" => Some(Status::Resolved),
            _ => None,
        }
    }
}

/// Capability level attached to a resolved identity. A closed enumeration
/// checked by explicit predicates, not an inheritance hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Resolved identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

/// Contact details for a filing user, resolved through the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// One filed issue as persisted in the complaint store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub category: Category,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    /// Filing day in server-local time; calendar-day filters compare against
    /// this field, independent of `created_at`.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub owner_id: UserId,
}

impl Complaint {
    pub fn view(&self, owner: Option<UserProfile>) -> ComplaintView {
        ComplaintView {
            id: self.id.display(),
            complaint_id: self.id.clone(),
            category: self.category,
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            date: self.date,
            owner,
            created_at: self.created_at,
        }
    }
}

/// Wire representation of a complaint. `id` is the short display id the
/// dashboard renders; `_id` remains the lookup key. `userId` is populated on
/// admin-visible reads and omitted on owner-scoped listings.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    pub id: String,
    #[serde(rename = "_id")]
    pub complaint_id: ComplaintId,
    pub category: Category,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub date: NaiveDate,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserProfile>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Raw submission payload as it arrives on the wire. Fields stay optional so
/// validation can report every problem at once instead of bailing on the
/// first missing key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintDraft {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl ComplaintDraft {
    /// Check every field and collect all violations.
    pub fn validate(&self) -> Result<ComplaintContent, ValidationError> {
        let mut errors = ValidationError::default();

        let category = match self.category.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match Category::parse(raw) {
                Some(category) => Some(category),
                None => {
                    errors.push("category", "Invalid category");
                    None
                }
            },
            _ => {
                errors.push("category", "Invalid category");
                None
            }
        };

        let description = match self.description.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("description", "Description is required");
                None
            }
            Some(trimmed) if trimmed.chars().count() < MIN_DESCRIPTION_CHARS => {
                errors.push("description", "Description must be at least 10 characters");
                None
            }
            Some(trimmed) => Some(trimmed.to_string()),
        };

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => Some(Priority::default()),
            Some(raw) => match Priority::parse(raw) {
                Some(priority) => Some(priority),
                None => {
                    errors.push("priority", "Invalid priority");
                    None
                }
            },
        };

        match (category, description, priority) {
            (Some(category), Some(description), Some(priority)) => Ok(ComplaintContent {
                category,
                description,
                priority,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated complaint attributes ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintContent {
    pub category: Category,
    pub description: String,
    pub priority: Priority,
}

/// One rejected field with the message surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Accumulates every violated field for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &'static str, message: &'static str) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Err(self)` when any field was rejected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
