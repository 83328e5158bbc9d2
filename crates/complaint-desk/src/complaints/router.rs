use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::auth::{authenticate, require_admin, GateError, IdentityResolver};
use super::domain::{Actor, Complaint, ComplaintDraft, ComplaintId, ComplaintView, Status};
use super::export::{self, ExportRow};
use super::query::ComplaintFilter;
use super::repository::{ComplaintRepository, DirectoryError, UserDirectory};
use super::service::{ComplaintService, ComplaintServiceError};
use super::stats::StatsService;

/// Shared handles the HTTP layer needs to serve complaint traffic.
pub struct ComplaintApi<R, D, I> {
    pub complaints: ComplaintService<R>,
    pub stats: StatsService<R>,
    pub directory: Arc<D>,
    pub identities: Arc<I>,
}

impl<R, D, I> ComplaintApi<R, D, I>
where
    R: ComplaintRepository,
    D: UserDirectory,
    I: IdentityResolver,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, identities: Arc<I>) -> Self {
        Self {
            complaints: ComplaintService::new(repository.clone()),
            stats: StatsService::new(repository),
            directory,
            identities,
        }
    }
}

/// Router exposing the complaint, statistics, and export endpoints under
/// `/api`. Every route authenticates; triage, statistics, and export also
/// pass the admin gate.
pub fn complaint_router<R, D, I>(api: Arc<ComplaintApi<R, D, I>>) -> Router
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    Router::new()
        .route(
            "/api/complaints",
            post(submit_handler::<R, D, I>).get(list_handler::<R, D, I>),
        )
        .route("/api/complaints/my", get(my_complaints_handler::<R, D, I>))
        .route("/api/complaints/:id", get(get_handler::<R, D, I>))
        .route(
            "/api/complaints/:id/status",
            patch(update_status_handler::<R, D, I>),
        )
        .route("/api/stats/total", get(total_handler::<R, D, I>))
        .route("/api/stats/pending", get(pending_handler::<R, D, I>))
        .route("/api/stats/resolved", get(resolved_handler::<R, D, I>))
        .route(
            "/api/stats/category-distribution",
            get(category_distribution_handler::<R, D, I>),
        )
        .route(
            "/api/stats/status-distribution",
            get(status_distribution_handler::<R, D, I>),
        )
        .route("/api/stats/all", get(all_stats_handler::<R, D, I>))
        .route("/api/export/csv", get(export_csv_handler::<R, D, I>))
        .with_state(api)
}

/// PATCH body for the administrative status update. The field stays optional
/// so a missing key surfaces as a validation error, not a deserialization
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

pub(crate) async fn submit_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
    Json(draft): Json<ComplaintDraft>,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match authenticate(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    match api.complaints.submit(&actor, draft) {
        Ok(complaint) => {
            let body = json!({
                "success": true,
                "message": "Complaint submitted successfully",
                "data": complaint.view(None),
            });
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => service_failure(&err),
    }
}

pub(crate) async fn list_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
    Query(filter): Query<ComplaintFilter>,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match authenticate(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    let complaints = match api.complaints.list(&actor, filter) {
        Ok(complaints) => complaints,
        Err(err) => return service_failure(&err),
    };

    match populate_views(api.directory.as_ref(), &complaints) {
        Ok(views) => list_response(views),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn my_complaints_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
    Query(filter): Query<ComplaintFilter>,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match authenticate(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    match api.complaints.list_own(&actor, filter) {
        Ok(complaints) => {
            let views = complaints
                .iter()
                .map(|complaint| complaint.view(None))
                .collect();
            list_response(views)
        }
        Err(err) => service_failure(&err),
    }
}

pub(crate) async fn get_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match authenticate(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    match api.complaints.get(&actor, &ComplaintId(id)) {
        Ok(complaint) => {
            let owner = match api.directory.lookup(&complaint.owner_id) {
                Ok(owner) => owner,
                Err(err) => return failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
            };
            let body = json!({ "success": true, "data": complaint.view(owner) });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_failure(&err),
    }
}

pub(crate) async fn update_status_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match admin_actor(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    let raw_status = payload.status.unwrap_or_default();
    match api
        .complaints
        .update_status(&actor, &ComplaintId(id), &raw_status)
    {
        Ok(complaint) => {
            let message = format!("Complaint status updated to {}", complaint.status.label());
            let body = json!({
                "success": true,
                "message": message,
                "data": complaint.view(None),
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_failure(&err),
    }
}

pub(crate) async fn total_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.total() {
        Ok(total) => success(json!({ "total": total })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn pending_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.count_by_status(Status::Pending) {
        Ok(pending) => success(json!({ "pending": pending })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn resolved_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.count_by_status(Status::Resolved) {
        Ok(resolved) => success(json!({ "resolved": resolved })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn category_distribution_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.category_distribution() {
        Ok(distribution) => success(json!({
            "labels": distribution.labels,
            "datasets": [{ "label": "Complaints", "data": distribution.data }],
        })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn status_distribution_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.status_distribution() {
        Ok(distribution) => success(json!({
            "labels": distribution.labels,
            "datasets": [{ "data": distribution.data }],
        })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn all_stats_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    if let Err(err) = admin_actor(api.identities.as_ref(), &headers) {
        return gate_failure(&err);
    }

    match api.stats.all() {
        Ok(snapshot) => success(json!(snapshot)),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

pub(crate) async fn export_csv_handler<R, D, I>(
    State(api): State<Arc<ComplaintApi<R, D, I>>>,
    headers: HeaderMap,
) -> Response
where
    R: ComplaintRepository + 'static,
    D: UserDirectory + 'static,
    I: IdentityResolver + 'static,
{
    let actor = match admin_actor(api.identities.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(err) => return gate_failure(&err),
    };

    let complaints = match api.complaints.list(&actor, ComplaintFilter::default()) {
        Ok(complaints) => complaints,
        Err(err) => return service_failure(&err),
    };

    let rows: Result<Vec<ExportRow>, DirectoryError> = complaints
        .into_iter()
        .map(|complaint| {
            let owner = api.directory.lookup(&complaint.owner_id)?;
            Ok(ExportRow { complaint, owner })
        })
        .collect();
    let rows = match rows {
        Ok(rows) => rows,
        Err(err) => return failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };

    let body = match export::to_csv(&rows) {
        Ok(body) => body,
        Err(err) => return failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };

    let disposition = format!(
        "attachment; filename=complaints_{}.csv",
        Local::now().date_naive()
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn admin_actor<I>(resolver: &I, headers: &HeaderMap) -> Result<Actor, GateError>
where
    I: IdentityResolver + ?Sized,
{
    let actor = authenticate(resolver, headers)?;
    require_admin(&actor)?;
    Ok(actor)
}

fn populate_views<D>(
    directory: &D,
    complaints: &[Complaint],
) -> Result<Vec<ComplaintView>, DirectoryError>
where
    D: UserDirectory + ?Sized,
{
    complaints
        .iter()
        .map(|complaint| {
            let owner = directory.lookup(&complaint.owner_id)?;
            Ok(complaint.view(owner))
        })
        .collect()
}

fn success(data: serde_json::Value) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

fn list_response(views: Vec<ComplaintView>) -> Response {
    let body = json!({ "success": true, "count": views.len(), "data": views });
    (StatusCode::OK, Json(body)).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = json!({ "success": false, "message": message });
    (status, Json(body)).into_response()
}

fn gate_failure(err: &GateError) -> Response {
    let status = match err {
        GateError::Unauthenticated | GateError::InvalidCredential => StatusCode::UNAUTHORIZED,
        GateError::Forbidden => StatusCode::FORBIDDEN,
        GateError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, &err.to_string())
}

fn service_failure(err: &ComplaintServiceError) -> Response {
    match err {
        ComplaintServiceError::Validation(validation) => {
            let body = json!({
                "success": false,
                "message": "Validation failed",
                "errors": &validation.errors,
            });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        ComplaintServiceError::Forbidden => failure(StatusCode::FORBIDDEN, &err.to_string()),
        ComplaintServiceError::NotFound => failure(StatusCode::NOT_FOUND, &err.to_string()),
        ComplaintServiceError::Repository(inner) => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, &inner.to_string())
        }
    }
}
