use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};

use super::claims::Claims;
use super::cookie;
use super::jwt::JwtKeys;
use crate::state::AppState;

/// Extracts and validates the session cookie, returning the claims.
///
/// For API endpoints that need an identity; page navigation goes through
/// the route gate instead.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::extract_session_token(&parts.headers).ok_or((
            StatusCode::UNAUTHORIZED,
            "missing session cookie".to_string(),
        ))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys
            .verify(&token)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid or expired token".to_string()))?;

        Ok(AuthUser(claims))
    }
}
