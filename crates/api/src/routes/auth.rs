//! Route definitions for authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register       -> register
/// POST   /login          -> login
/// POST   /token/access   -> rotate_access_token
/// GET    /me             -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token/access", post(auth::rotate_access_token))
        .route("/me", get(auth::me))
}
