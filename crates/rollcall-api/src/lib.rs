//! # rollcall-api — Axum HTTP Adapter
//!
//! The HTTP surface over the Rollcall event service.
//!
//! ## API Surface
//!
//! | Prefix                          | Module             | Audience    |
//! |---------------------------------|--------------------|-------------|
//! | `GET/POST /v1/events/{org}/*`   | [`routes::events`] | Participants |
//! | `PUT/POST /v1/events/{org}/*`   | [`routes::admin`]  | Organizers  |
//! | `/openapi.json`                 | [`openapi`]        | Tooling     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`) sit outside the metrics middleware.

pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::events::router())
        .merge(routes::admin::router())
        .merge(openapi::router())
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — 200 whenever the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 once the application can serve.
async fn readiness() -> &'static str {
    "ready"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_probes_respond() {
        let app = app(AppState::in_memory());
        let (status, _) = send(&app, get("/health/liveness")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, get("/health/readiness")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_spec_served() {
        let app = app(AppState::in_memory());
        let (status, body) = send(&app, get("/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Rollcall API");
    }

    #[tokio::test]
    async fn signup_flow_end_to_end() {
        // No recurrence configured: the window is always open.
        let app = app(AppState::in_memory());

        let (status, body) = send(
            &app,
            post(
                "/v1/events/pickup/signups",
                json!({"name": "Alice", "deviceId": "dA"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["listType"], "main");
        assert_eq!(body["position"], 1);
        assert_eq!(body["message"], "You're in! Spot #1");

        let (status, body) = send(&app, get("/v1/events/pickup")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mainList"][0]["name"], "Alice");
        assert_eq!(body["capacity"], 18);
        assert_eq!(body["accessStatus"]["isOpen"], true);
    }

    #[tokio::test]
    async fn duplicate_signup_maps_to_conflict() {
        let app = app(AppState::in_memory());
        let request = json!({"name": "Alice", "deviceId": "dA"});
        send(&app, post("/v1/events/pickup/signups", request.clone())).await;
        let (status, body) = send(&app, post("/v1/events/pickup/signups", request)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "duplicate_device");
    }

    #[tokio::test]
    async fn withdraw_requires_owning_device() {
        let app = app(AppState::in_memory());
        let (_, created) = send(
            &app,
            post(
                "/v1/events/pickup/signups",
                json!({"name": "Alice", "deviceId": "dA"}),
            ),
        )
        .await;
        let id = created["person"]["id"].as_str().unwrap().to_string();

        let uri = format!("/v1/events/pickup/signups/{id}?deviceId=other");
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "forbidden");

        let uri = format!("/v1/events/pickup/signups/{id}?deviceId=dA");
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "You're off the list");
    }

    #[tokio::test]
    async fn capacity_endpoint_validates_and_rebalances() {
        let app = app(AppState::in_memory());
        let (status, body) = send(
            &app,
            put("/v1/events/pickup/capacity", json!({"capacity": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation");

        let (status, body) = send(
            &app,
            put("/v1/events/pickup/capacity", json!({"capacity": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["promoted"], json!([]));
    }

    #[tokio::test]
    async fn recurrence_endpoint_rejects_unknown_timezone() {
        let app = app(AppState::in_memory());
        let config = json!({
            "enabled": true,
            "startDay": 5, "startHour": 18, "startMinute": 0,
            "endDay": 1, "endHour": 9, "endMinute": 0,
            "timezone": "Mars/Olympus",
            "cadence": {"kind": "weekly"}
        });
        let (status, body) = send(&app, put("/v1/events/pickup/recurrence", config)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation");

        let config = json!({
            "enabled": true,
            "startDay": 5, "startHour": 18, "startMinute": 0,
            "endDay": 1, "endHour": 9, "endMinute": 0,
            "timezone": "America/Chicago",
            "cadence": {"kind": "weekly"}
        });
        let (status, _) = send(&app, put("/v1/events/pickup/recurrence", config)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn snooze_requires_credentials() {
        let app = app(AppState::in_memory());
        let (status, body) = send(&app, post("/v1/events/pickup/snooze", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation");
    }

    #[tokio::test]
    async fn archive_starts_empty() {
        let app = app(AppState::in_memory());
        let (status, body) = send(&app, get("/v1/events/pickup/archive")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn email_check_reports_not_due_without_config() {
        let app = app(AppState::in_memory());
        let (status, body) = send(&app, post("/v1/events/pickup/email-check", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sentPeriod"], Value::Null);
    }
}
