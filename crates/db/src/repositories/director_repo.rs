//! Repository for the `directors` table.

use marquee_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::director::{CreateDirector, Director, UpdateDirector};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, dob, nationality, created_at, updated_at, version";

/// Provides CRUD operations for directors.
pub struct DirectorRepo;

impl DirectorRepo {
    /// Insert a new director, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateDirector,
    ) -> Result<Director, sqlx::Error> {
        let query = format!(
            "INSERT INTO directors (name, dob, nationality)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Director>(&query)
            .bind(&input.name)
            .bind(input.dob)
            .bind(&input.nationality)
            .fetch_one(executor)
            .await
    }

    /// Find a director by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Director>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM directors WHERE id = $1");
        sqlx::query_as::<_, Director>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all directors ordered by id.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Director>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM directors ORDER BY id");
        sqlx::query_as::<_, Director>(&query)
            .fetch_all(executor)
            .await
    }

    /// Update a director. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateDirector,
    ) -> Result<Option<Director>, sqlx::Error> {
        let query = format!(
            "UPDATE directors SET
                name = COALESCE($2, name),
                dob = COALESCE($3, dob),
                nationality = COALESCE($4, nationality),
                updated_at = NOW(),
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Director>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.dob)
            .bind(&input.nationality)
            .fetch_optional(executor)
            .await
    }

    /// Delete a director. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while any movie references it.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM directors WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
