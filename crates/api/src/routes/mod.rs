pub mod auth;
pub mod director;
pub mod genre;
pub mod health;
pub mod movie;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 create account from Basic credentials
/// /auth/login                    token pair from Basic credentials
/// /auth/token/access             new access token from a refresh token
/// /auth/me                       caller's identity (auth required)
///
/// /movies                        list (public), create (admin)
/// /movies/{id}                   get (public), update, delete (admin)
///
/// /directors                     list (auth), create (admin)
/// /directors/{id}                get (auth), update, delete (admin)
///
/// /genres                        list (auth), create (admin)
/// /genres/{id}                   get (auth), update, delete (admin)
///
/// /users                         list, create (admin)
/// /users/{id}                    get, update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/movies", movie::router())
        .nest("/directors", director::router())
        .nest("/genres", genre::router())
        .nest("/users", user::router())
}
