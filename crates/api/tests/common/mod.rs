//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use marquee_api::auth::jwt::{generate_token, JwtConfig, TokenType};
use marquee_api::auth::password::hash_password;
use marquee_api::config::ServerConfig;
use marquee_api::router::build_app_router;
use marquee_api::state::AppState;
use marquee_core::roles::{ROLE_ADMIN, ROLE_USER};
use marquee_core::types::DbId;
use marquee_db::models::director::CreateDirector;
use marquee_db::models::genre::CreateGenre;
use marquee_db::models::user::{CreateUser, User};
use marquee_db::repositories::{DirectorRepo, GenreRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// JWT settings shared by the app under test and the token helpers.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-that-is-long-enough".to_string(),
        refresh_secret: "test-refresh-secret-that-is-long-enough".to_string(),
        access_token_expiry_secs: 300,
        refresh_token_expiry_hours: 24,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

/// Build the full application router, including the production middleware
/// stack, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).expect("test config is valid")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn access_token(user: &User) -> String {
    generate_token(user.id, &user.role, TokenType::Access, &test_jwt_config()).unwrap()
}

pub fn refresh_token(user: &User) -> String {
    generate_token(user.id, &user.role, TokenType::Refresh, &test_jwt_config()).unwrap()
}

/// Create an admin and return an access token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    let admin = create_user(pool, "admin@marquee.test", ROLE_ADMIN).await;
    access_token(&admin)
}

/// Create a regular user and return an access token for it.
pub async fn user_token(pool: &PgPool) -> String {
    let user = create_user(pool, "viewer@marquee.test", ROLE_USER).await;
    access_token(&user)
}

pub async fn seed_director(pool: &PgPool, name: &str) -> DbId {
    DirectorRepo::create(
        pool,
        &CreateDirector {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(1967, 10, 3).unwrap(),
            nationality: "Canadian".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_genre(pool: &PgPool, name: &str) -> DbId {
    GenreRepo::create(
        pool,
        &CreateGenre {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&bearer(token)), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(&bearer(token)), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(&bearer(token)), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&bearer(token)), None).await
}

/// POST with a raw `Authorization` header value and no body.
pub async fn post_with_authorization(app: Router, uri: &str, authorization: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(authorization), None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
