//! Repository for the `movies` and `movie_genres` tables.

use marquee_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::movie::{Movie, MovieChanges, MovieView, MovieViewRow, NewMovie};

/// Column list for the `movies` table.
const COLUMNS: &str = "id, title, detail_id, director_id, created_at, updated_at, version";

/// SELECT + FROM clause of the hydrated movie view (`movies` aliased as `m`).
///
/// Detail and director are inner joins: both are guaranteed to exist.
/// Genres are aggregated into a JSON array ordered by genre id.
pub(crate) const VIEW_SELECT: &str = "SELECT m.id, m.title, m.version, m.created_at, m.updated_at, \
        md.id AS detail_id, md.detail, \
        d.id AS director_id, d.name AS director_name, d.dob AS director_dob, \
        d.nationality AS director_nationality, \
        COALESCE(( \
            SELECT json_agg(json_build_object('id', g.id, 'name', g.name) ORDER BY g.id) \
            FROM movie_genres mg \
            JOIN genres g ON g.id = mg.genre_id \
            WHERE mg.movie_id = m.id \
        ), '[]'::json) AS genres \
     FROM movies m \
     JOIN movie_details md ON md.id = m.detail_id \
     JOIN directors d ON d.id = m.director_id";

/// Provides CRUD operations for movie rows and their genre associations.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie row referencing an existing detail and director.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewMovie<'_>,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, detail_id, director_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(input.title)
            .bind(input.detail_id)
            .bind(input.director_id)
            .fetch_one(executor)
            .await
    }

    /// Find a movie row by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a movie row by ID and lock it until the transaction ends.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a movie row by exact title.
    pub async fn find_by_title<'e>(
        executor: impl PgExecutor<'e>,
        title: &str,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE title = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(title)
            .fetch_optional(executor)
            .await
    }

    /// Find the hydrated view of a movie.
    pub async fn find_view_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<MovieView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE m.id = $1");
        let row = sqlx::query_as::<_, MovieViewRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(MovieView::from))
    }

    /// Apply scalar changes, bumping `version` and `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        changes: &MovieChanges<'_>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = COALESCE($2, title),
                director_id = COALESCE($3, director_id),
                updated_at = NOW(),
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.director_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a movie row. Its `movie_genres` rows go with it (cascade);
    /// the detail row is left for the caller to remove.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of movies directed by `director_id`.
    pub async fn count_by_director<'e>(
        executor: impl PgExecutor<'e>,
        director_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies WHERE director_id = $1")
            .bind(director_id)
            .fetch_one(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Genre association helpers
    // -----------------------------------------------------------------------

    /// Genre ids associated with a movie, ascending.
    pub async fn genre_ids<'e>(
        executor: impl PgExecutor<'e>,
        movie_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT genre_id FROM movie_genres WHERE movie_id = $1 ORDER BY genre_id",
        )
        .bind(movie_id)
        .fetch_all(executor)
        .await
    }

    /// Replace all genre associations for a movie.
    ///
    /// Deletes existing associations, then inserts the new set. Run it on the
    /// connection of an open transaction so the swap is atomic.
    pub async fn replace_genres(
        conn: &mut PgConnection,
        movie_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *conn)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id) \
                 SELECT $1, UNNEST($2::BIGINT[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(movie_id)
            .bind(genre_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
