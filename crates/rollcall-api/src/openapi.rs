//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one spec, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the whole surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Recurring signup events: bounded main list with waitlist, timezone-aware access windows, whitelisted-member priority, per-period snooze, and weekly rollover with archival.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Events
        crate::routes::events::get_event,
        crate::routes::events::create_signup,
        crate::routes::events::withdraw_signup,
        crate::routes::events::snooze_member,
        crate::routes::events::unsnooze_member,
        // Admin
        crate::routes::admin::update_capacity,
        crate::routes::admin::update_recurrence,
        crate::routes::admin::update_settings,
        crate::routes::admin::update_whitelist,
        crate::routes::admin::get_archive,
        crate::routes::admin::run_email_check,
    ),
    components(schemas(
        crate::routes::events::SignupRequest,
        crate::routes::events::SnoozeRequest,
        crate::routes::events::UnsnoozeRequest,
        crate::routes::admin::CapacityRequest,
        crate::routes::admin::EmailCheckResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "events", description = "Participant-facing event operations"),
        (name = "admin", description = "Organizer document writes and triggers"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
