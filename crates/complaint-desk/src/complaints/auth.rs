use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use super::domain::{Actor, Role};

/// Resolves a bearer credential to the acting identity. Credential issuance
/// and verification belong to the external authentication service; this trait
/// is the seam the HTTP layer calls through.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, credential: &str) -> Result<Actor, AuthError>;
}

/// Failure modes of the identity resolver.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid or expired credential")]
    InvalidCredential,
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Request-level authorization failures, worded as the client sees them.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Authentication required.")]
    Unauthenticated,
    #[error("Invalid or expired credential.")]
    InvalidCredential,
    #[error("Access denied. Admin role required.")]
    Forbidden,
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

impl From<AuthError> for GateError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredential => Self::InvalidCredential,
            AuthError::Unavailable(message) => Self::Unavailable(message),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the acting identity from request headers.
pub fn authenticate<I>(resolver: &I, headers: &HeaderMap) -> Result<Actor, GateError>
where
    I: IdentityResolver + ?Sized,
{
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(GateError::Unauthenticated)?;
    let token = bearer_token(header).ok_or(GateError::Unauthenticated)?;
    Ok(resolver.resolve(token)?)
}

/// Admin gate applied in front of triage, statistics, and export operations.
pub fn require_admin(actor: &Actor) -> Result<(), GateError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(GateError::Forbidden)
    }
}
