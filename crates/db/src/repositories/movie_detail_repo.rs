//! Repository for the `movie_details` table.
//!
//! Detail rows have no life of their own; only the movie aggregate writer
//! creates, updates and deletes them.

use marquee_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::movie::MovieDetail;

pub struct MovieDetailRepo;

impl MovieDetailRepo {
    /// Insert a detail row, returning it with its generated id.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        detail: &str,
    ) -> Result<MovieDetail, sqlx::Error> {
        sqlx::query_as::<_, MovieDetail>(
            "INSERT INTO movie_details (detail) VALUES ($1) RETURNING id, detail",
        )
        .bind(detail)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<MovieDetail>, sqlx::Error> {
        sqlx::query_as::<_, MovieDetail>("SELECT id, detail FROM movie_details WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Replace the detail text. Returns `true` if the row exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        detail: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE movie_details SET detail = $2 WHERE id = $1")
            .bind(id)
            .bind(detail)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a detail row. The owning movie must already be gone.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movie_details WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
