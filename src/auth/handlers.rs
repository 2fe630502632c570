use std::time::Duration;

use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use super::cookie;
use super::dto::{
    AuthResponse, LoginRequest, MeResponse, MessageResponse, PublicUser, RegisterRequest,
    RegisterResponse, VerifyEmailRequest,
};
use super::extractors::AuthUser;
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::{is_unique_violation, User};
use super::verification;
use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on the verification-mail send.
const MAIL_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);
    let name = payload.name.trim().to_string();

    if name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }
    if name.chars().count() < 2 {
        return Err(ApiError::Validation(
            "Name must be at least 2 characters".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation(
            "Please provide a valid email address".into(),
        ));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if let (Some(token), Some(verifier)) = (payload.challenge_token.as_deref(), &state.challenge) {
        let passed = verifier.verify(token).await?;
        if !passed {
            warn!(email = %payload.email, "challenge verification failed");
            return Err(ApiError::Validation("Challenge verification failed".into()));
        }
    }

    // Friendly pre-check; the unique index still backstops concurrent inserts.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let (code, code_expires_at) = verification::issue();

    let user = User::create(&state.db, &name, &payload.email, &hash, &code, code_expires_at)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(email = %payload.email, "email already registered");
                ApiError::Conflict("Email already registered".into())
            } else {
                ApiError::Internal(e.into())
            }
        })?;

    let delivery = match tokio::time::timeout(
        MAIL_TIMEOUT,
        state.mailer.send_verification_code(&user.email, &code),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("verification email timed out")),
    };

    if let Err(e) = delivery {
        // Roll the creation back so the address can retry cleanly.
        if let Err(delete_err) = User::delete(&state.db, user.id).await {
            error!(error = %delete_err, user_id = %user.id, "rollback delete failed");
        }
        return Err(ApiError::Delivery(e));
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Please verify your email address.".into(),
            redirect_url: format!("/auth/verify?email={}", user.email),
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation(
            "Please provide a valid email address".into(),
        ));
    }

    // Unknown email and wrong password answer identically.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Auth
        })?;

    if !user.is_verified {
        warn!(user_id = %user.id, "login before email verification");
        return Err(ApiError::VerificationRequired);
    }

    let ok = verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Auth);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email, Some(&user.name))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie::session_cookie(&token, state.config.cookie_secure)
            .map_err(|e| ApiError::Internal(e.into()))?,
    );

    info!(user_id = %user.id, "user logged in");
    Ok((
        headers,
        Json(AuthResponse {
            message: "Login successful".into(),
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(mut payload): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);
    let code = payload.code.trim();

    if payload.email.is_empty() || code.is_empty() {
        return Err(ApiError::Validation("Email and code are required".into()));
    }

    let verified = User::confirm_email(&state.db, &payload.email, code).await?;
    if !verified {
        // Wrong, expired, already-consumed, and unknown email all land here.
        warn!(email = %payload.email, "verification code rejected");
        return Err(ApiError::Validation(
            "Invalid or expired verification code".into(),
        ));
    }

    info!(email = %payload.email, "email verified");
    Ok(Json(MessageResponse {
        message: "Email address verified successfully".into(),
    }))
}

#[instrument(skip(state, session))]
pub async fn me(
    State(state): State<AppState>,
    session: Option<AuthUser>,
) -> Result<Json<MeResponse>, ApiError> {
    let Some(AuthUser(claims)) = session else {
        return Ok(Json(MeResponse { user: None }));
    };

    let user = User::find_by_id(&state.db, claims.sub).await?;
    Ok(Json(MeResponse {
        user: user.as_ref().map(PublicUser::from),
    }))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie::clear_session_cookie(state.config.cookie_secure)
            .map_err(|e| ApiError::Internal(e.into()))?,
    );
    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out".into(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ada@Example.Com "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
    }

    #[tokio::test]
    async fn me_without_cookie_returns_null_user() {
        use axum::body::Body;
        use axum::http::Request as HttpRequest;
        use tower::util::ServiceExt;

        let state = crate::state::AppState::fake();
        let app = auth_routes().with_state(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "user": null }));
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        use axum::body::Body;
        use axum::http::Request as HttpRequest;
        use tower::util::ServiceExt;

        let state = crate::state::AppState::fake();
        let app = auth_routes().with_state(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cleared.starts_with("token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
