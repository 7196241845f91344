use std::fmt;

use serde::Serialize;

use crate::types::DbId;

/// Kind of shared entity a movie refers to by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Director,
    Genre,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Director => "director",
            ReferenceKind::Genre => "genre",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Referenced {kind} not found: {missing:?}")]
    ReferenceNotFound {
        kind: ReferenceKind,
        missing: Vec<DbId>,
    },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
