//! Director entity model and DTOs.

use chrono::NaiveDate;
use marquee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `directors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub id: DbId,
    pub name: String,
    pub dob: NaiveDate,
    pub nationality: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: i32,
}

/// DTO for creating a director.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirector {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub dob: NaiveDate,
    #[validate(length(min = 1, message = "nationality must not be empty"))]
    pub nationality: String,
}

/// DTO for updating a director. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDirector {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(min = 1, message = "nationality must not be empty"))]
    pub nationality: Option<String>,
}
