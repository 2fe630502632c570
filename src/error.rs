use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Failures surfaced by the API handlers.
///
/// Every variant renders as `{"error": "..."}` with a conventional status
/// code; internal causes are logged here and never reach the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    Auth,
    #[error("Please verify your email address first")]
    VerificationRequired,
    #[error("Verification email could not be sent")]
    Delivery(#[source] anyhow::Error),
    #[error("Something went wrong, please try again later")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::VerificationRequired => StatusCode::FORBIDDEN,
            ApiError::Delivery(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Delivery(source) | ApiError::Internal(source) = &self {
            error!(error = %source, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = ApiError::Validation("All fields are required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = ApiError::Conflict("Email already registered".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn auth_is_generic_and_401() {
        let err = ApiError::Auth;
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn verification_required_maps_to_403() {
        let resp = ApiError::VerificationRequired.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_hides_the_cause() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused (10.0.0.3:5432)"));
        let msg = err.to_string();
        assert!(!msg.contains("10.0.0.3"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_is_a_single_error_field() {
        let resp = ApiError::Auth.into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Invalid credentials" }));
    }
}
