//! # Public Event Endpoints
//!
//! The participant-facing surface: read the event state, sign up,
//! withdraw, snooze, and unsnooze.
//!
//! ## Endpoints
//!
//! - `GET /v1/events/{org}` — public state (lists, window, snoozed names)
//! - `POST /v1/events/{org}/signups` — sign up
//! - `DELETE /v1/events/{org}/signups/{id}` — withdraw
//! - `POST /v1/events/{org}/snooze` — snooze a whitelisted member
//! - `POST /v1/events/{org}/unsnooze` — restore a snoozed member

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use rollcall_core::{OrgId, ParticipantId};
use rollcall_engine::{PublicState, SignupResponse, SnoozeResponse, WithdrawResponse};

use crate::error::ApiError;
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to sign up for the event.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Client-supplied device identity.
    pub device_id: String,
}

/// Query parameters for withdrawal.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawParams {
    /// Device identity that created the signup.
    pub device_id: String,
    /// Withdraw from the waitlist instead of the main list.
    #[serde(default)]
    pub from_waitlist: bool,
}

/// Request to snooze a whitelisted member for the current period.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnoozeRequest {
    /// Participant id; required with the legacy password, optional with
    /// a snooze code (the code identifies its member).
    pub participant_id: Option<String>,
    /// Per-member snooze code.
    pub code: Option<String>,
    /// Shared legacy password.
    pub password: Option<String>,
}

/// Request to restore a snoozed member.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnsnoozeRequest {
    /// Member name; required with the legacy password, optional with a
    /// snooze code.
    pub person_name: Option<String>,
    /// Per-member snooze code.
    pub code: Option<String>,
    /// Shared legacy password.
    pub password: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the public events router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/events/{org}", get(get_event))
        .route("/v1/events/{org}/signups", post(create_signup))
        .route("/v1/events/{org}/signups/{id}", delete(withdraw_signup))
        .route("/v1/events/{org}/snooze", post(snooze_member))
        .route("/v1/events/{org}/unsnooze", post(unsnooze_member))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/events/{org} — public event state.
#[utoipa::path(
    get,
    path = "/v1/events/{org}",
    params(("org" = String, Path, description = "Organization slug")),
    responses(
        (status = 200, description = "Lists, capacity, window status, snoozed names"),
    ),
    tag = "events",
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<PublicState>, ApiError> {
    let public = state.service.get_public_state(&OrgId(org)).await?;
    Ok(Json(public))
}

/// POST /v1/events/{org}/signups — sign up.
#[utoipa::path(
    post,
    path = "/v1/events/{org}/signups",
    params(("org" = String, Path, description = "Organization slug")),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Placed on the main list or waitlist"),
        (status = 403, description = "Window closed", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate device or name", body = crate::error::ErrorBody),
        (status = 422, description = "Missing input", body = crate::error::ErrorBody),
    ),
    tag = "events",
)]
pub async fn create_signup(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let response = state
        .service
        .signup(&OrgId(org), &request.name, &request.device_id)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /v1/events/{org}/signups/{id} — withdraw.
#[utoipa::path(
    delete,
    path = "/v1/events/{org}/signups/{id}",
    params(
        ("org" = String, Path, description = "Organization slug"),
        ("id" = String, Path, description = "Participant id"),
        WithdrawParams,
    ),
    responses(
        (status = 200, description = "Removed; reports any waitlist promotion"),
        (status = 403, description = "Not the owning device, or withdrawals locked", body = crate::error::ErrorBody),
        (status = 404, description = "No such signup in the indicated list", body = crate::error::ErrorBody),
    ),
    tag = "events",
)]
pub async fn withdraw_signup(
    State(state): State<AppState>,
    Path((org, id)): Path<(String, String)>,
    Query(params): Query<WithdrawParams>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    let response = state
        .service
        .withdraw(
            &OrgId(org),
            &ParticipantId(id),
            &params.device_id,
            params.from_waitlist,
        )
        .await?;
    Ok(Json(response))
}

/// POST /v1/events/{org}/snooze — snooze a whitelisted member.
#[utoipa::path(
    post,
    path = "/v1/events/{org}/snooze",
    params(("org" = String, Path, description = "Organization slug")),
    request_body = SnoozeRequest,
    responses(
        (status = 200, description = "Member snoozed for the current period"),
        (status = 401, description = "Bad snooze code or password", body = crate::error::ErrorBody),
        (status = 403, description = "Member is not whitelisted", body = crate::error::ErrorBody),
        (status = 404, description = "Member is not on the main list", body = crate::error::ErrorBody),
    ),
    tag = "events",
)]
pub async fn snooze_member(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(request): Json<SnoozeRequest>,
) -> Result<Json<SnoozeResponse>, ApiError> {
    let id = request.participant_id.map(ParticipantId);
    let response = state
        .service
        .snooze(
            &OrgId(org),
            id.as_ref(),
            request.code.as_deref(),
            request.password.as_deref(),
        )
        .await?;
    Ok(Json(response))
}

/// POST /v1/events/{org}/unsnooze — restore a snoozed member.
#[utoipa::path(
    post,
    path = "/v1/events/{org}/unsnooze",
    params(("org" = String, Path, description = "Organization slug")),
    request_body = UnsnoozeRequest,
    responses(
        (status = 200, description = "Snapshot restored through the rebalancer"),
        (status = 401, description = "Bad snooze code or password", body = crate::error::ErrorBody),
        (status = 403, description = "Window closed", body = crate::error::ErrorBody),
        (status = 404, description = "No snoozed entry this period", body = crate::error::ErrorBody),
    ),
    tag = "events",
)]
pub async fn unsnooze_member(
    State(state): State<AppState>,
    Path(org): Path<String>,
    Json(request): Json<UnsnoozeRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let response = state
        .service
        .unsnooze(
            &OrgId(org),
            request.person_name.as_deref(),
            request.code.as_deref(),
            request.password.as_deref(),
        )
        .await?;
    Ok(Json(response))
}
