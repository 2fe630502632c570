use axum::{
    extract::{FromRef, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

use super::cookie;
use super::jwt::JwtKeys;
use crate::state::AppState;

const LOGIN_ROUTE: &str = "/auth/login";

/// Middleware guarding page routes behind a login session.
///
/// Valid tokens pass through with the claims attached to the request; a
/// dead token is cleared alongside the redirect so the client does not
/// loop on it.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = cookie::extract_session_token(req.headers()) else {
        return Redirect::to(LOGIN_ROUTE).into_response();
    };

    let keys = JwtKeys::from_ref(&state);
    match keys.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => {
            warn!(path = %req.uri().path(), "rejected stale session token");
            let mut response = Redirect::to(LOGIN_ROUTE).into_response();
            if let Ok(cleared) = cookie::clear_session_cookie(state.config.cookie_secure) {
                response.headers_mut().append(SET_COOKIE, cleared);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use jsonwebtoken::{encode, Header};
    use time::{Duration, OffsetDateTime};
    use tower::util::ServiceExt;
    use uuid::Uuid;

    fn gated_app(state: AppState) -> Router {
        Router::new()
            .route("/courses", get(|| async { "course catalog" }))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_session,
            ))
            .with_state(state)
    }

    async fn request_with_cookie(state: AppState, cookie: Option<&str>) -> axum::response::Response {
        let mut builder = HttpRequest::builder().method("GET").uri("/courses");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        gated_app(state)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_login() {
        let response = request_with_cookie(AppState::fake(), None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login"
        );
        // Nothing to clear when no cookie came in.
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn valid_token_passes_through() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys
            .sign(Uuid::new_v4(), "ada@example.com", Some("Ada"))
            .unwrap();
        let response = request_with_cookie(state, Some(&format!("token={token}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn garbage_token_redirects_and_clears_cookie() {
        let response =
            request_with_cookie(AppState::fake(), Some("token=not-a-real-token")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cleared = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cleared.starts_with("token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn expired_token_redirects_and_clears_cookie() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let issued = OffsetDateTime::now_utc() - Duration::hours(25);
        let claims = crate::auth::claims::Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: None,
            iat: issued.unix_timestamp() as usize,
            exp: (issued + super::super::jwt::SESSION_TTL).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        let response = request_with_cookie(state, Some(&format!("token={token}"))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login"
        );
        let cleared = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
    }
}
