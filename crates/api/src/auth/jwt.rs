//! JWT access and refresh tokens.
//!
//! Both token kinds are HS256-signed JWTs carrying a [`Claims`] payload with a
//! `type` claim. Access and refresh tokens are signed with different secrets,
//! so one can never be validated as the other even before the `type` check.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use marquee_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{env_or, env_required, ConfigError};

/// Kind of token, carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Expected a {} token", .expected.as_str())]
    WrongType { expected: TokenType },
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens.
    pub refresh_secret: String,
    /// Access token lifetime in seconds (default: 300).
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in hours (default: 24).
    pub refresh_token_expiry_hours: i64,
}

/// Default access token expiry in seconds.
const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 300;
/// Default refresh token expiry in hours.
const DEFAULT_REFRESH_EXPIRY_HOURS: i64 = 24;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`        | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET`       | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_SECS`   | no       | `300`   |
    /// | `REFRESH_TOKEN_EXPIRY_HOURS` | no       | `24`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_secret: env_required("ACCESS_TOKEN_SECRET")?,
            refresh_secret: env_required("REFRESH_TOKEN_SECRET")?,
            access_token_expiry_secs: env_or(
                "ACCESS_TOKEN_EXPIRY_SECS",
                DEFAULT_ACCESS_EXPIRY_SECS,
            )?,
            refresh_token_expiry_hours: env_or(
                "REFRESH_TOKEN_EXPIRY_HOURS",
                DEFAULT_REFRESH_EXPIRY_HOURS,
            )?,
        })
    }

    fn secret(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Access => self.access_secret.as_bytes(),
            TokenType::Refresh => self.refresh_secret.as_bytes(),
        }
    }

    fn lifetime_secs(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_token_expiry_secs,
            TokenType::Refresh => self.refresh_token_expiry_hours * 3600,
        }
    }
}

/// Generate a signed token of the given type for a user.
pub fn generate_token(
    user_id: DbId,
    role: &str,
    token_type: TokenType,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        token_type,
        exp: now + config.lifetime_secs(token_type),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret(token_type)),
    )
}

/// Validate a token of the `expected` type and return its [`Claims`].
///
/// The signature is checked with the secret of `expected`, then `exp`, then
/// the `type` claim.
pub fn validate_token(
    token: &str,
    expected: TokenType,
    config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret(expected)),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    if token_data.claims.token_type != expected {
        return Err(TokenError::WrongType { expected });
    }
    Ok(token_data.claims)
}
