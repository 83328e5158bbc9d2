use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use complaint_desk::complaints::{
    Actor, AuthError, Complaint, ComplaintId, ComplaintQuery, ComplaintRepository, DirectoryError,
    IdentityResolver, RepositoryError, Role, UserDirectory, UserId, UserProfile,
};
use complaint_desk::config::AuthConfig;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryComplaintRepository {
    records: Arc<Mutex<HashMap<ComplaintId, Complaint>>>,
}

impl ComplaintRepository for InMemoryComplaintRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryUserDirectory {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryUserDirectory {
    pub(crate) fn register(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn lookup(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Static token-to-actor map standing in for the external authentication
/// service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryIdentityResolver {
    tokens: Arc<Mutex<HashMap<String, Actor>>>,
}

impl InMemoryIdentityResolver {
    pub(crate) fn register(&self, token: &str, actor: Actor) {
        self.tokens
            .lock()
            .expect("resolver mutex poisoned")
            .insert(token.to_string(), actor);
    }
}

impl IdentityResolver for InMemoryIdentityResolver {
    fn resolve(&self, credential: &str) -> Result<Actor, AuthError> {
        let guard = self.tokens.lock().expect("resolver mutex poisoned");
        guard
            .get(credential)
            .cloned()
            .ok_or(AuthError::InvalidCredential)
    }
}

/// Register the configured seed credentials. Without them every request is
/// rejected until a real authentication service is plugged in.
pub(crate) fn seed_identities(
    auth: &AuthConfig,
    directory: &InMemoryUserDirectory,
    identities: &InMemoryIdentityResolver,
) {
    if let Some(token) = &auth.admin_token {
        let actor = Actor {
            id: UserId("admin".to_string()),
            role: Role::Admin,
        };
        directory.register(UserProfile {
            id: actor.id.clone(),
            name: "Administrator".to_string(),
            email: "admin@complaint.desk".to_string(),
        });
        identities.register(token, actor);
    }

    if let Some(token) = &auth.user_token {
        let actor = Actor {
            id: UserId("demo-user".to_string()),
            role: Role::User,
        };
        directory.register(UserProfile {
            id: actor.id.clone(),
            name: "Demo User".to_string(),
            email: "demo@complaint.desk".to_string(),
        });
        identities.register(token, actor);
    }
}
