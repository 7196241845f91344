//! Repository for the `genres` table.

use marquee_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::genre::{CreateGenre, Genre, UpdateGenre};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at, version";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateGenre,
    ) -> Result<Genre, sqlx::Error> {
        let query = format!(
            "INSERT INTO genres (name)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .fetch_one(executor)
            .await
    }

    /// Find a genre by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a genre by exact name.
    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE name = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Fetch every genre whose id is in `ids`, ordered by id.
    ///
    /// Ids that do not exist are simply absent from the result.
    pub async fn find_by_ids<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Genre>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List all genres ordered by id.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres ORDER BY id");
        sqlx::query_as::<_, Genre>(&query).fetch_all(executor).await
    }

    /// Ids of the movies associated with a genre, ascending.
    pub async fn movie_ids<'e>(
        executor: impl PgExecutor<'e>,
        genre_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT movie_id FROM movie_genres WHERE genre_id = $1 ORDER BY movie_id",
        )
        .bind(genre_id)
        .fetch_all(executor)
        .await
    }

    /// Update a genre. Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateGenre,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!(
            "UPDATE genres SET
                name = COALESCE($2, name),
                updated_at = NOW(),
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(executor)
            .await
    }

    /// Delete a genre. Its movie associations are removed by cascade;
    /// the movies themselves are untouched.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
