//! Parsing of `Authorization` header values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use marquee_core::error::CoreError;

/// Email and password carried by a `Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

fn malformed() -> CoreError {
    CoreError::Validation("Malformed authorization header".into())
}

/// Split `"<scheme> <token>"`, checking the scheme case-insensitively.
fn split_scheme<'a>(raw: &'a str, scheme: &str) -> Result<&'a str, CoreError> {
    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(s), Some(token), None) if s.eq_ignore_ascii_case(scheme) && !token.is_empty() => {
            Ok(token)
        }
        _ => Err(malformed()),
    }
}

/// Parse `Basic base64(email:password)`.
///
/// The decoded value must contain exactly one `:`.
pub fn parse_basic_token(raw: &str) -> Result<BasicCredentials, CoreError> {
    let token = split_scheme(raw, "basic")?;
    let decoded = STANDARD.decode(token).map_err(|_| malformed())?;
    let decoded = String::from_utf8(decoded).map_err(|_| malformed())?;

    let mut parts = decoded.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(email), Some(password), None) => Ok(BasicCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(malformed()),
    }
}

/// Parse `Bearer <jwt>` and return the token part.
pub fn parse_bearer_token(raw: &str) -> Result<&str, CoreError> {
    split_scheme(raw, "bearer")
}
