//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use marquee_core::error::CoreError;
use marquee_core::types::DbId;

use crate::auth::header::parse_bearer_token;
use crate::auth::jwt::{validate_token, TokenError, TokenType};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer access token.
///
/// Refresh tokens are rejected here: they are only accepted by
/// `POST /auth/token/access`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = parse_bearer_token(auth_header)
            .map_err(|_| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims =
            validate_token(token, TokenType::Access, &state.config.jwt).map_err(|e| match e {
                TokenError::Expired => unauthorized("Token has expired"),
                TokenError::Invalid | TokenError::WrongType { .. } => {
                    unauthorized("Invalid access token")
                }
            })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
