use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::complaints::auth::{AuthError, IdentityResolver};
use crate::complaints::domain::{
    Actor, Category, Complaint, ComplaintDraft, ComplaintId, Priority, Role, Status, UserId,
    UserProfile,
};
use crate::complaints::query::ComplaintQuery;
use crate::complaints::repository::{
    ComplaintRepository, DirectoryError, RepositoryError, UserDirectory,
};
use crate::complaints::router::{complaint_router, ComplaintApi};

pub(super) const ADMIN_TOKEN: &str = "admin-token";
pub(super) const REPORTER_TOKEN: &str = "reporter-token";
pub(super) const OUTSIDER_TOKEN: &str = "outsider-token";

pub(super) fn admin() -> Actor {
    Actor {
        id: UserId("admin-1".to_string()),
        role: Role::Admin,
    }
}

pub(super) fn reporter() -> Actor {
    Actor {
        id: UserId("user-1".to_string()),
        role: Role::User,
    }
}

pub(super) fn outsider() -> Actor {
    Actor {
        id: UserId("user-2".to_string()),
        role: Role::User,
    }
}

pub(super) fn profile_for(actor: &Actor, name: &str) -> UserProfile {
    UserProfile {
        id: actor.id.clone(),
        name: name.to_string(),
        email: format!("{}@example.net", name.to_lowercase().replace(' ', ".")),
    }
}

pub(super) fn draft(category: &str, description: &str, priority: Option<&str>) -> ComplaintDraft {
    ComplaintDraft {
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        priority: priority.map(str::to_string),
    }
}

/// Build a complaint directly against the repository, bypassing the service,
/// so tests control every field including timestamps.
pub(super) fn stored_complaint(
    id: &str,
    owner: &Actor,
    category: Category,
    priority: Priority,
    status: Status,
    day: NaiveDate,
    seq: i64,
) -> Complaint {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid base timestamp");
    Complaint {
        id: ComplaintId(id.to_string()),
        category,
        description: format!("Stored complaint {id} used by the filtering tests"),
        priority,
        status,
        date: day,
        created_at: base + Duration::seconds(seq),
        owner_id: owner.id.clone(),
    }
}

pub(super) fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).expect("valid date")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ComplaintId, Complaint>>>,
}

impl ComplaintRepository for MemoryRepository {
    fn insert(&self, complaint: Complaint) -> Result<Complaint, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&complaint.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(complaint.id.clone(), complaint.clone());
        Ok(complaint)
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<Complaint>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, complaint: Complaint) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&complaint.id) {
            guard.insert(complaint.id.clone(), complaint);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn find(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matches: Vec<Complaint> = guard
            .values()
            .filter(|complaint| query.matches(complaint))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(matches)
    }

    fn count(&self, query: &ComplaintQuery) -> Result<u64, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|complaint| query.matches(complaint))
            .count() as u64)
    }
}

/// Repository double whose every call fails, for 500-path coverage.
pub(super) struct UnavailableRepository;

impl ComplaintRepository for UnavailableRepository {
    fn insert(&self, _complaint: Complaint) -> Result<Complaint, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ComplaintId) -> Result<Option<Complaint>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _complaint: Complaint) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _query: &ComplaintQuery) -> Result<Vec<Complaint>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _query: &ComplaintQuery) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl MemoryDirectory {
    pub(super) fn register(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl UserDirectory for MemoryDirectory {
    fn lookup(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryResolver {
    tokens: Arc<Mutex<HashMap<String, Actor>>>,
}

impl MemoryResolver {
    pub(super) fn register(&self, token: &str, actor: Actor) {
        self.tokens
            .lock()
            .expect("resolver mutex poisoned")
            .insert(token.to_string(), actor);
    }
}

impl IdentityResolver for MemoryResolver {
    fn resolve(&self, credential: &str) -> Result<Actor, AuthError> {
        let guard = self.tokens.lock().expect("resolver mutex poisoned");
        guard
            .get(credential)
            .cloned()
            .ok_or(AuthError::InvalidCredential)
    }
}

pub(super) type TestApi = ComplaintApi<MemoryRepository, MemoryDirectory, MemoryResolver>;

/// Fully wired API with the three standard accounts registered.
pub(super) fn build_api() -> (Arc<TestApi>, MemoryRepository, MemoryDirectory, MemoryResolver) {
    let repository = MemoryRepository::default();
    let directory = MemoryDirectory::default();
    let resolver = MemoryResolver::default();

    directory.register(profile_for(&admin(), "Desk Admin"));
    directory.register(profile_for(&reporter(), "Rita Reporter"));
    directory.register(profile_for(&outsider(), "Omar Outsider"));

    resolver.register(ADMIN_TOKEN, admin());
    resolver.register(REPORTER_TOKEN, reporter());
    resolver.register(OUTSIDER_TOKEN, outsider());

    let api = Arc::new(ComplaintApi::new(
        Arc::new(repository.clone()),
        Arc::new(directory.clone()),
        Arc::new(resolver.clone()),
    ));
    (api, repository, directory, resolver)
}

pub(super) fn test_router() -> (axum::Router, MemoryRepository) {
    let (api, repository, _, _) = build_api();
    (complaint_router(api), repository)
}

pub(super) fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
