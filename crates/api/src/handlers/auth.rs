//! Handlers for the `/auth` resource.
//!
//! Registration and login read `Authorization: Basic base64(email:password)`.
//! Login returns a refresh/access token pair; a refresh token is exchanged
//! for a new access token at `/auth/token/access`.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::roles::ROLE_USER;
use marquee_core::types::DbId;
use marquee_db::models::user::{CreateUser, UserResponse};
use marquee_db::repositories::UserRepo;
use serde::Serialize;
use validator::ValidateEmail;

use crate::auth::header::{parse_basic_token, parse_bearer_token, BasicCredentials};
use crate::auth::jwt::{generate_token, validate_token, TokenError, TokenType};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::user::hash_new_password;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Token pair returned by `POST /auth/login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub refresh_token: String,
    pub access_token: String,
}

/// Fresh access token returned by `POST /auth/token/access`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// The caller as seen by the access token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn authorization(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })
}

fn basic_credentials(headers: &HeaderMap) -> AppResult<BasicCredentials> {
    Ok(parse_basic_token(authorization(headers)?)?)
}

fn issue(user_id: DbId, role: &str, token_type: TokenType, state: &AppState) -> AppResult<String> {
    generate_token(user_id, role, token_type, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a `user` account from Basic credentials.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let creds = basic_credentials(&headers)?;
    if !creds.email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(
            "email must be a valid address".into(),
        )));
    }

    if UserRepo::find_by_email(&state.pool, &creds.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::AlreadyExists(format!(
            "A user with email '{}' already exists",
            creds.email
        ))));
    }

    let password_hash = hash_new_password(&creds.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: creds.email,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Verify Basic credentials and return a refresh/access token pair.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenPair>> {
    let creds = basic_credentials(&headers)?;

    let user = UserRepo::find_by_email(&state.pool, &creds.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&creds.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenPair {
        refresh_token: issue(user.id, &user.role, TokenType::Refresh, &state)?,
        access_token: issue(user.id, &user.role, TokenType::Access, &state)?,
    }))
}

/// POST /api/v1/auth/token/access
///
/// Exchange `Authorization: Bearer <refresh token>` for a new access token.
/// An expired refresh token is 401; anything else that is not a valid
/// refresh token is 400.
pub async fn rotate_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<AccessTokenResponse>> {
    let token = parse_bearer_token(authorization(&headers)?)?;

    let claims = validate_token(token, TokenType::Refresh, &state.config.jwt).map_err(|e| {
        match e {
            TokenError::Expired => AppError::Core(CoreError::Unauthorized(e.to_string())),
            TokenError::Invalid | TokenError::WrongType { .. } => {
                AppError::BadRequest(e.to_string())
            }
        }
    })?;

    Ok(Json(AccessTokenResponse {
        access_token: issue(claims.sub, &claims.role, TokenType::Access, &state)?,
    }))
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: MeResponse {
            id: user.user_id,
            role: user.role,
        },
    }))
}
