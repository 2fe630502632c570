mod dto;
pub mod handlers;
pub mod repo;

use crate::auth::gate;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // Course catalog is only for logged-in users.
        .route("/courses", get(handlers::list_courses))
        .route_layer(middleware::from_fn_with_state(
            state,
            gate::require_session,
        ))
        .route("/projects", get(handlers::list_projects))
        .route("/stats", get(handlers::stats))
}
