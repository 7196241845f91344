//! Error type for repository and catalog operations.
//!
//! A [`DbError`] is either a domain failure the caller can act on (wrapped
//! [`CoreError`]) or an opaque store failure. Duplicate-key violations on the
//! known unique constraints are reclassified as [`CoreError::AlreadyExists`]
//! so a lost title race surfaces exactly like the read-then-write check.

use marquee_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Store failure: {0}")]
    Store(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match duplicate_message(&err) {
            Some(message) => DbError::Domain(CoreError::AlreadyExists(message.to_string())),
            None => DbError::Store(err),
        }
    }
}

/// Message for a unique violation on one of the known constraints.
fn duplicate_message(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some(UNIQUE_VIOLATION) {
        return None;
    }
    match db_err.constraint()? {
        "uq_movies_title" => Some("A movie with this title already exists"),
        "uq_genres_name" => Some("A genre with this name already exists"),
        "uq_users_email" => Some("A user with this email already exists"),
        _ => None,
    }
}
