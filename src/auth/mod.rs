use crate::state::AppState;
use axum::Router;

mod claims;
mod cookie;
mod dto;
pub(crate) mod extractors;
pub mod gate;
pub mod handlers;
mod jwt;
mod password;
pub mod repo;
mod verification;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
