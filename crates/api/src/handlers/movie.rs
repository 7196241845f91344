//! Handlers for the `/movies` resource.
//!
//! Reads are public. Writes require the `admin` role and go through the
//! aggregate writer, so each one is a single transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::types::DbId;
use marquee_db::catalog::{MovieQuery, MovieWriter};
use marquee_db::models::movie::{CreateMovie, UpdateMovie};
use marquee_db::repositories::MovieRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListMoviesParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/movies?title=&order=&cursor=&take=
///
/// One page of movies as `{ data, nextCursor, count }`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> AppResult<impl IntoResponse> {
    let page = MovieQuery::list(&state.pool, &params.into()).await?;
    Ok(Json(page))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = MovieRepo::find_view_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id,
        }))?;
    Ok(Json(DataResponse { data: movie }))
}

/// POST /api/v1/movies
///
/// Create a movie with its detail, director and genres.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let movie = MovieWriter::create(&state.pool, &input).await?;
    tracing::info!(movie_id = movie.id, user_id = admin.user_id, "Movie created via API");

    Ok((StatusCode::CREATED, Json(DataResponse { data: movie })))
}

/// PATCH /api/v1/movies/{id}
///
/// Absent fields are left unchanged; `genreIds` replaces the whole set.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let movie = MovieWriter::update(&state.pool, id, &input).await?;
    tracing::info!(movie_id = id, user_id = admin.user_id, "Movie updated via API");

    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{id}
///
/// Returns the deleted id.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = MovieWriter::delete(&state.pool, id).await?;
    tracing::info!(movie_id = deleted, user_id = admin.user_id, "Movie deleted via API");

    Ok(Json(DataResponse { data: deleted }))
}
