//! Integration tests for the `/auth` endpoints.

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{
    access_token, body_json, create_user, get, get_auth, post_with_authorization, refresh_token,
    test_jwt_config, TEST_PASSWORD,
};
use marquee_api::auth::jwt::{generate_token, TokenType};
use marquee_core::roles::{ROLE_ADMIN, ROLE_USER};
use sqlx::PgPool;

fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_a_user_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_with_authorization(
        app,
        "/api/v1/auth/register",
        &basic("chani@arrakis.test", "desert-power"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "chani@arrakis.test");
    assert_eq!(json["data"]["role"], ROLE_USER);
    assert!(json["data"].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_email_is_409(pool: PgPool) {
    create_user(&pool, "chani@arrakis.test", ROLE_USER).await;

    let app = common::build_test_app(pool);
    let response = post_with_authorization(
        app,
        "/api/v1/auth/register",
        &basic("chani@arrakis.test", "desert-power"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "ALREADY_EXISTS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_malformed_headers(pool: PgPool) {
    let malformed = [
        "Basic not-base64!!".to_string(),
        format!("Basic {}", STANDARD.encode("no-colon-here")),
        format!("Basic {}", STANDARD.encode("a@b.test:pass:word")),
        format!("Token {}", STANDARD.encode("a@b.test:password")),
    ];

    for header in malformed {
        let app = common::build_test_app(pool.clone());
        let response = post_with_authorization(app, "/api/v1/auth/register", &header).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "header: {header}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_bad_email_and_short_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response =
        post_with_authorization(app, "/api/v1/auth/register", &basic("not-an-email", "long-enough"))
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response =
        post_with_authorization(app, "/api/v1/auth/register", &basic("a@b.test", "short")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_a_token_pair(pool: PgPool) {
    create_user(&pool, "stilgar@arrakis.test", ROLE_ADMIN).await;

    let app = common::build_test_app(pool.clone());
    let response = post_with_authorization(
        app,
        "/api/v1/auth/login",
        &basic("stilgar@arrakis.test", TEST_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let access = json["accessToken"].as_str().unwrap();
    assert!(json["refreshToken"].is_string());

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", access).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], ROLE_ADMIN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_or_unknown_email_is_401(pool: PgPool) {
    create_user(&pool, "stilgar@arrakis.test", ROLE_USER).await;

    let app = common::build_test_app(pool.clone());
    let response = post_with_authorization(
        app,
        "/api/v1/auth/login",
        &basic("stilgar@arrakis.test", "wrong-password"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let app = common::build_test_app(pool);
    let response = post_with_authorization(
        app,
        "/api/v1/auth/login",
        &basic("nobody@arrakis.test", TEST_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Both failures read the same so account existence does not leak.
    assert_eq!(body_json(response).await["error"], wrong_password["error"]);
}

// ---------------------------------------------------------------------------
// Access token rotation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_token_buys_a_new_access_token(pool: PgPool) {
    let user = create_user(&pool, "jessica@arrakis.test", ROLE_USER).await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_with_authorization(app, "/api/v1/auth/token/access", &bearer(&refresh_token(&user)))
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let access = body_json(response).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", &access).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn access_token_cannot_be_used_as_refresh_token(pool: PgPool) {
    let user = create_user(&pool, "jessica@arrakis.test", ROLE_USER).await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_with_authorization(app, "/api/v1/auth/token/access", &bearer(&access_token(&user)))
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response =
        post_with_authorization(app, "/api/v1/auth/token/access", &bearer("garbage")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_refresh_token_is_401(pool: PgPool) {
    let user = create_user(&pool, "jessica@arrakis.test", ROLE_USER).await;
    let mut config = test_jwt_config();
    config.refresh_token_expiry_hours = -1;
    let expired = generate_token(user.id, &user.role, TokenType::Refresh, &config).unwrap();

    let app = common::build_test_app(pool);
    let response =
        post_with_authorization(app, "/api/v1/auth/token/access", &bearer(&expired)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Protected routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_requires_an_access_token(pool: PgPool) {
    let user = create_user(&pool, "leto@arrakis.test", ROLE_USER).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", &refresh_token(&user)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
