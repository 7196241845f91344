//! Transactional writes of the movie aggregate.
//!
//! A movie is written together with its detail row, its director reference
//! and its genre set. Every public operation runs in exactly one
//! [`UnitOfWork`]: either all of its statements commit or none do. The
//! hydrated result is read back only after the commit has completed.

use marquee_core::error::{CoreError, ReferenceKind};
use marquee_core::genre_set::{distinct_ids, ensure_all_found};
use marquee_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::{DbError, DbResult};
use crate::models::movie::{CreateMovie, MovieChanges, MovieView, NewMovie, UpdateMovie};
use crate::repositories::{DirectorRepo, GenreRepo, MovieDetailRepo, MovieRepo};
use crate::unit_of_work::UnitOfWork;

/// Entity name used in `NotFound` errors.
const ENTITY: &str = "Movie";

/// Orchestrates create / update / delete of the movie aggregate.
pub struct MovieWriter;

impl MovieWriter {
    /// Create a movie, its detail and its genre associations.
    ///
    /// Fails with `AlreadyExists` for a taken title and `ReferenceNotFound`
    /// for an unknown director or any unknown genre; nothing is persisted
    /// in either case.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> DbResult<MovieView> {
        let mut uow = UnitOfWork::begin(pool).await?;
        let outcome = Self::create_in(uow.conn(), input).await;
        let movie_id = uow.finish(outcome).await?;

        tracing::info!(movie_id, title = %input.title, "Movie created");
        Self::hydrate(pool, movie_id).await
    }

    /// Patch a movie. `genre_ids`, when present, replaces the whole set.
    ///
    /// An empty patch changes nothing and returns the current state.
    pub async fn update(pool: &PgPool, id: DbId, patch: &UpdateMovie) -> DbResult<MovieView> {
        let mut uow = UnitOfWork::begin(pool).await?;
        let outcome = Self::update_in(uow.conn(), id, patch).await;
        uow.finish(outcome).await?;

        tracing::info!(movie_id = id, "Movie updated");
        Self::hydrate(pool, id).await
    }

    /// Delete a movie and its detail. Directors and genres are never touched.
    ///
    /// Returns the id of the deleted movie.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<DbId> {
        let mut uow = UnitOfWork::begin(pool).await?;
        let outcome = Self::delete_in(uow.conn(), id).await;
        let deleted = uow.finish(outcome).await?;

        tracing::info!(movie_id = deleted, "Movie deleted");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Transaction bodies
    // -----------------------------------------------------------------------

    async fn create_in(conn: &mut PgConnection, input: &CreateMovie) -> DbResult<DbId> {
        if MovieRepo::find_by_title(&mut *conn, &input.title)
            .await?
            .is_some()
        {
            return Err(title_taken(&input.title));
        }

        Self::ensure_director(conn, input.director_id).await?;
        let genre_ids = Self::resolve_genres(conn, &input.genre_ids).await?;

        let detail = MovieDetailRepo::create(&mut *conn, &input.detail).await?;
        let movie = MovieRepo::create(
            &mut *conn,
            &NewMovie {
                title: &input.title,
                detail_id: detail.id,
                director_id: input.director_id,
            },
        )
        .await?;
        MovieRepo::replace_genres(conn, movie.id, &genre_ids).await?;

        tracing::debug!(
            movie_id = movie.id,
            detail_id = detail.id,
            director_id = input.director_id,
            ?genre_ids,
            "Movie aggregate inserted"
        );
        Ok(movie.id)
    }

    async fn update_in(conn: &mut PgConnection, id: DbId, patch: &UpdateMovie) -> DbResult<()> {
        let movie = MovieRepo::find_by_id_for_update(&mut *conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        if patch.is_empty() {
            return Ok(());
        }

        if let Some(director_id) = patch.director_id {
            Self::ensure_director(conn, director_id).await?;
        }

        let genre_ids = match &patch.genre_ids {
            Some(ids) => Some(Self::resolve_genres(conn, ids).await?),
            None => None,
        };

        if let Some(title) = &patch.title {
            let holder = MovieRepo::find_by_title(&mut *conn, title).await?;
            if holder.is_some_and(|other| other.id != id) {
                return Err(title_taken(title));
            }
        }

        let changes = MovieChanges {
            title: patch.title.as_deref(),
            director_id: patch.director_id,
        };
        MovieRepo::update(&mut *conn, id, &changes)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        if let Some(detail) = &patch.detail {
            MovieDetailRepo::update(&mut *conn, movie.detail_id, detail).await?;
        }

        if let Some(genre_ids) = genre_ids {
            MovieRepo::replace_genres(conn, id, &genre_ids).await?;
        }

        Ok(())
    }

    async fn delete_in(conn: &mut PgConnection, id: DbId) -> DbResult<DbId> {
        let movie = MovieRepo::find_by_id_for_update(&mut *conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        // The movie row references the detail, so it has to go first.
        MovieRepo::delete(&mut *conn, id).await?;
        MovieDetailRepo::delete(&mut *conn, movie.detail_id).await?;

        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Reference resolution
    // -----------------------------------------------------------------------

    async fn ensure_director(conn: &mut PgConnection, director_id: DbId) -> DbResult<()> {
        match DirectorRepo::find_by_id(&mut *conn, director_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::ReferenceNotFound {
                kind: ReferenceKind::Director,
                missing: vec![director_id],
            }
            .into()),
        }
    }

    /// Resolve the full genre set; returns the distinct ids, ascending.
    async fn resolve_genres(conn: &mut PgConnection, requested: &[DbId]) -> DbResult<Vec<DbId>> {
        let distinct = distinct_ids(requested);
        if distinct.is_empty() {
            return Err(CoreError::Validation("genreIds must not be empty".into()).into());
        }

        let found: Vec<DbId> = GenreRepo::find_by_ids(&mut *conn, &distinct)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();
        ensure_all_found(ReferenceKind::Genre, &distinct, &found)?;

        Ok(distinct)
    }

    /// Read the committed aggregate back.
    async fn hydrate(pool: &PgPool, id: DbId) -> DbResult<MovieView> {
        MovieRepo::find_view_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: ENTITY, id }.into())
    }
}

fn title_taken(title: &str) -> DbError {
    CoreError::AlreadyExists(format!("A movie titled '{title}' already exists")).into()
}
