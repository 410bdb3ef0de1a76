//! # API Error Types
//!
//! Maps the domain error taxonomy onto HTTP status codes and a uniform
//! JSON error body. Storage and schedule failures surface as 500s with
//! the message withheld from the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rollcall_core::RollcallError;
use rollcall_engine::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// Every non-2xx response uses this shape. `next_open` is populated only
/// for window-closed rejections that can compute the next open instant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `"access_closed"`.
    pub code: String,
    /// Human-readable message, suitable for direct display.
    pub message: String,
    /// Next window-open instant, for `access_closed` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_open: Option<chrono::DateTime<chrono::Utc>>,
}

/// Error type for every handler, implementing [`IntoResponse`].
#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl From<RollcallError> for ApiError {
    fn from(err: RollcallError) -> Self {
        Self(ServiceError::Domain(err))
    }
}

/// Status code for each domain rejection.
fn domain_status(err: &RollcallError) -> StatusCode {
    match err {
        RollcallError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RollcallError::AccessClosed { .. }
        | RollcallError::Forbidden
        | RollcallError::NotPrivileged => StatusCode::FORBIDDEN,
        RollcallError::DuplicateDevice | RollcallError::DuplicateName => StatusCode::CONFLICT,
        RollcallError::NotFound | RollcallError::NotOnMainList | RollcallError::NotSnoozed => {
            StatusCode::NOT_FOUND
        }
        RollcallError::Authentication => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            ServiceError::Domain(err) => {
                let next_open = match err {
                    RollcallError::AccessClosed { next_open, .. } => *next_open,
                    _ => None,
                };
                (
                    domain_status(err),
                    ErrorBody {
                        error: ErrorDetail {
                            code: err.code().to_string(),
                            message: err.to_string(),
                            next_open,
                        },
                    },
                )
            }
            // Backend failures are logged, never echoed to clients.
            ServiceError::Store(err) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_body())
            }
            ServiceError::Schedule(err) => {
                tracing::error!(error = %err, "schedule configuration failure");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_body())
            }
        };
        (status, Json(body)).into_response()
    }
}

fn internal_body() -> ErrorBody {
    ErrorBody {
        error: ErrorDetail {
            code: "internal".to_string(),
            message: "An internal error occurred".to_string(),
            next_open: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use rollcall_store::StoreError;

    async fn response_parts(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn access_closed_is_403_with_next_open() {
        let at = Utc.with_ymd_and_hms(2026, 1, 23, 18, 0, 0).unwrap();
        let err = ApiError::from(RollcallError::AccessClosed {
            message: "RSVP is closed. Opens Friday at 6:00 PM".into(),
            next_open: Some(at),
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error.code, "access_closed");
        assert_eq!(body.error.next_open, Some(at));
    }

    #[tokio::test]
    async fn duplicate_device_is_409() {
        let (status, body) = response_parts(ApiError::from(RollcallError::DuplicateDevice)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "duplicate_device");
        assert!(body.error.next_open.is_none());
    }

    #[tokio::test]
    async fn validation_is_422() {
        let (status, body) =
            response_parts(ApiError::from(RollcallError::validation("name is required"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "validation");
        assert!(body.error.message.contains("name is required"));
    }

    #[tokio::test]
    async fn bad_credentials_are_401() {
        let (status, body) = response_parts(ApiError::from(RollcallError::Authentication)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error.code, "authentication");
    }

    #[tokio::test]
    async fn not_snoozed_is_404() {
        let (status, body) = response_parts(ApiError::from(RollcallError::NotSnoozed)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "not_snoozed");
    }

    #[tokio::test]
    async fn store_failure_hides_details() {
        let err = ApiError(ServiceError::Store(StoreError::Backend(
            "connection refused".into(),
        )));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "internal");
        assert!(
            !body.error.message.contains("connection refused"),
            "backend details must not leak: {}",
            body.error.message
        );
    }
}
