use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::dto::ContactRequest;
use super::repo::ContactMessage;
use crate::auth::handlers::{is_valid_email, normalize_email};
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = payload.name.trim();
    let email = normalize_email(&payload.email);
    let subject = payload.subject.trim();
    let message = payload.message.trim();

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid contact email");
        return Err(ApiError::Validation(
            "Please provide a valid email address".into(),
        ));
    }

    ContactMessage::create(&state.db, name, &email, subject, message).await?;

    info!(email = %email, "contact message stored");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Your message has been sent" })),
    ))
}
