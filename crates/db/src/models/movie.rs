//! Movie aggregate models and DTOs.
//!
//! A movie row owns exactly one `movie_details` row, references one shared
//! director and a set of shared genres through `movie_genres`. The
//! [`MovieView`] is the fully hydrated read model returned by every movie
//! endpoint.

use chrono::NaiveDate;
use marquee_core::cursor::{CursorSource, CursorValue};
use marquee_core::sort::SortField;
use marquee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub detail_id: DbId,
    pub director_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: i32,
}

/// A row from the `movie_details` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MovieDetail {
    pub id: DbId,
    pub detail: String,
}

/// Director fields embedded in a [`MovieView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorSummary {
    pub id: DbId,
    pub name: String,
    pub dob: NaiveDate,
    pub nationality: String,
}

/// Genre fields embedded in a [`MovieView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub id: DbId,
    pub name: String,
}

/// Fully hydrated movie: scalars, detail, director and genres.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: DbId,
    pub title: String,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub detail: MovieDetail,
    pub director: DirectorSummary,
    /// Ordered by genre id.
    pub genres: Vec<GenreSummary>,
}

impl MovieView {
    pub fn genre_ids(&self) -> Vec<DbId> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

/// Flat row produced by the hydrated movie query; genres arrive as a JSON array.
#[derive(Debug, FromRow)]
pub struct MovieViewRow {
    pub id: DbId,
    pub title: String,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub detail_id: DbId,
    pub detail: String,
    pub director_id: DbId,
    pub director_name: String,
    pub director_dob: NaiveDate,
    pub director_nationality: String,
    pub genres: Json<Vec<GenreSummary>>,
}

impl From<MovieViewRow> for MovieView {
    fn from(row: MovieViewRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
            detail: MovieDetail {
                id: row.detail_id,
                detail: row.detail,
            },
            director: DirectorSummary {
                id: row.director_id,
                name: row.director_name,
                dob: row.director_dob,
                nationality: row.director_nationality,
            },
            genres: row.genres.0,
        }
    }
}

impl CursorSource for MovieView {
    fn cursor_id(&self) -> DbId {
        self.id
    }

    fn cursor_value(&self, field: SortField) -> CursorValue {
        match field {
            SortField::Id => CursorValue::Int(self.id),
            SortField::Title => CursorValue::Text(self.title.clone()),
            SortField::CreatedAt => CursorValue::Timestamp(self.created_at),
            SortField::UpdatedAt => CursorValue::Timestamp(self.updated_at),
        }
    }
}

/// DTO for creating a movie together with its detail and relations.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    // Upper bound matches MAX_TITLE_LEN and the movies.title CHECK.
    #[validate(length(min = 1, max = 500, message = "title must be 1 to 500 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "detail must not be empty"))]
    pub detail: String,
    pub director_id: DbId,
    #[validate(length(min = 1, message = "genreIds must not be empty"))]
    pub genre_ids: Vec<DbId>,
}

/// DTO for patching a movie. Absent fields are left unchanged.
///
/// `genre_ids`, when present, replaces the whole genre set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovie {
    // Upper bound matches MAX_TITLE_LEN and the movies.title CHECK.
    #[validate(length(min = 1, max = 500, message = "title must be 1 to 500 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "detail must not be empty"))]
    pub detail: Option<String>,
    pub director_id: Option<DbId>,
    #[validate(length(min = 1, message = "genreIds must not be empty"))]
    pub genre_ids: Option<Vec<DbId>>,
}

impl UpdateMovie {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.detail.is_none()
            && self.director_id.is_none()
            && self.genre_ids.is_none()
    }
}

/// Insert parameters for the `movies` row itself.
#[derive(Debug, Clone)]
pub struct NewMovie<'a> {
    pub title: &'a str,
    pub detail_id: DbId,
    pub director_id: DbId,
}

/// Scalar changes applied to the `movies` row during an update.
#[derive(Debug, Clone, Default)]
pub struct MovieChanges<'a> {
    pub title: Option<&'a str>,
    pub director_id: Option<DbId>,
}

/// Listing request consumed by [`crate::catalog::MovieQuery::list`].
#[derive(Debug, Clone, Default)]
pub struct MovieListQuery {
    /// Case-sensitive substring filter on the title.
    pub title: Option<String>,
    /// `field_DIRECTION` sort keys; empty means `id_DESC`.
    pub order: Vec<String>,
    pub cursor: Option<String>,
    pub take: Option<i64>,
}

/// One page of movies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub data: Vec<MovieView>,
    pub next_cursor: Option<String>,
    /// Rows matching the filter, independent of the cursor.
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use marquee_core::types::MAX_TITLE_LEN;

    use super::*;

    fn create(title: String) -> CreateMovie {
        CreateMovie {
            title,
            detail: "detail".to_string(),
            director_id: 1,
            genre_ids: vec![1],
        }
    }

    #[test]
    fn title_length_is_bounded_by_max_title_len() {
        assert!(create("é".repeat(MAX_TITLE_LEN)).validate().is_ok());
        assert!(create("x".repeat(MAX_TITLE_LEN + 1)).validate().is_err());
        assert!(create(String::new()).validate().is_err());

        let patch = UpdateMovie {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
