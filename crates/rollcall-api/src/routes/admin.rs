//! # Organizer Admin Endpoints
//!
//! Document writes an organizer performs through their dashboard, plus
//! the archive read and the email-check trigger. Deployments front these
//! with their own authentication layer.
//!
//! ## Endpoints
//!
//! - `PUT /v1/events/{org}/capacity` — change capacity, rebalance now
//! - `PUT /v1/events/{org}/recurrence` — replace the recurrence config
//! - `PUT /v1/events/{org}/settings` — replace the org settings
//! - `PUT /v1/events/{org}/whitelist` — replace the whitelist
//! - `GET /v1/events/{org}/archive` — archived periods, newest last
//! - `POST /v1/events/{org}/email-check` — run the email-due check

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use rollcall_core::{ArchiveEntry, OrgId, OrgSettings, RecurrenceConfig, WhitelistEntry};
use rollcall_engine::CapacityResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// Request to change the main-list capacity.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CapacityRequest {
    /// New capacity, at least 1.
    pub capacity: usize,
}

/// Result of an email-check trigger.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailCheckResponse {
    /// Period marked as emailed by this call, if the email was due.
    pub sent_period: Option<String>,
}

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/events/{org}/capacity", put(update_capacity))
        .route("/v1/events/{org}/recurrence", put(update_recurrence))
        .route("/v1/events/{org}/settings", put(update_settings))
        .route("/v1/events/{org}/whitelist", put(update_whitelist))
        .route("/v1/events/{org}/archive", get(get_archive))
        .route("/v1/events/{org}/email-check", post(run_email_check))
}

/// PUT /v1/events/{org}/capacity — change capacity and rebalance.
#[utoipa::path(
    put,
    path = "/v1/events/{org}/capacity",
    params(("org" = String, Path, description = "Organization slug")),
    request_body = CapacityRequest,
    responses(
        (status = 200, description = "Rebalanced lists with who moved"),
        (status = 422, description = "Capacity below 1", body = crate::error::ErrorBody),
    ),
    tag = "admin",
)]
pub async fn update_capacity(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(request): Json<CapacityRequest>,
) -> Result<Json<CapacityResponse>, ApiError> {
    let response = state
        .service
        .update_capacity(&OrgId(org), request.capacity)
        .await?;
    Ok(Json(response))
}

/// PUT /v1/events/{org}/recurrence — replace the recurrence config.
#[utoipa::path(
    put,
    path = "/v1/events/{org}/recurrence",
    params(("org" = String, Path, description = "Organization slug")),
    responses(
        (status = 204, description = "Stored"),
        (status = 422, description = "Out-of-range fields or unknown timezone", body = crate::error::ErrorBody),
    ),
    tag = "admin",
)]
pub async fn update_recurrence(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(config): Json<RecurrenceConfig>,
) -> Result<StatusCode, ApiError> {
    state.service.set_recurrence(&OrgId(org), &config).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/events/{org}/settings — replace the org settings.
#[utoipa::path(
    put,
    path = "/v1/events/{org}/settings",
    params(("org" = String, Path, description = "Organization slug")),
    responses(
        (status = 204, description = "Stored"),
        (status = 422, description = "Invalid settings", body = crate::error::ErrorBody),
    ),
    tag = "admin",
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(settings): Json<OrgSettings>,
) -> Result<StatusCode, ApiError> {
    state.service.set_settings(&OrgId(org), &settings).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/events/{org}/whitelist — replace the whitelist.
#[utoipa::path(
    put,
    path = "/v1/events/{org}/whitelist",
    params(("org" = String, Path, description = "Organization slug")),
    responses((status = 204, description = "Stored")),
    tag = "admin",
)]
pub async fn update_whitelist(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(entries): Json<Vec<WhitelistEntry>>,
) -> Result<StatusCode, ApiError> {
    state.service.set_whitelist(&OrgId(org), &entries).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/events/{org}/archive — archived periods, newest last.
#[utoipa::path(
    get,
    path = "/v1/events/{org}/archive",
    params(("org" = String, Path, description = "Organization slug")),
    responses((status = 200, description = "Up to twelve archived periods")),
    tag = "admin",
)]
pub async fn get_archive(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<Vec<ArchiveEntry>>, ApiError> {
    let archive = state.service.get_archive(&OrgId(org)).await?;
    Ok(Json(archive))
}

/// POST /v1/events/{org}/email-check — run the email-due check.
#[utoipa::path(
    post,
    path = "/v1/events/{org}/email-check",
    params(("org" = String, Path, description = "Organization slug")),
    responses(
        (status = 200, description = "Whether the roster email went due, and for which period", body = EmailCheckResponse),
    ),
    tag = "admin",
)]
pub async fn run_email_check(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<EmailCheckResponse>, ApiError> {
    let sent_period = state.service.run_email_check(&OrgId(org)).await?;
    Ok(Json(EmailCheckResponse { sent_period }))
}
