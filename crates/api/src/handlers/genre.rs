//! Handlers for the `/genres` resource.
//!
//! Genre names are unique. The pre-check gives a readable error; the
//! `uq_genres_name` constraint catches the concurrent case.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::types::DbId;
use marquee_db::models::genre::{CreateGenre, GenreWithMovies, UpdateGenre};
use marquee_db::repositories::GenreRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Genre", id })
}

fn name_taken(name: &str) -> AppError {
    AppError::Core(CoreError::AlreadyExists(format!(
        "A genre named '{name}' already exists"
    )))
}

/// GET /api/v1/genres
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let genres = GenreRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// GET /api/v1/genres/{id}
///
/// Includes the ids of the movies using the genre.
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let movie_ids = GenreRepo::movie_ids(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: GenreWithMovies { genre, movie_ids },
    }))
}

/// POST /api/v1/genres
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGenre>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if GenreRepo::find_by_name(&state.pool, &input.name)
        .await?
        .is_some()
    {
        return Err(name_taken(&input.name));
    }

    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(genre_id = genre.id, name = %genre.name, "Genre created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// PATCH /api/v1/genres/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGenre>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(name) = &input.name {
        let holder = GenreRepo::find_by_name(&state.pool, name).await?;
        if holder.is_some_and(|other| other.id != id) {
            return Err(name_taken(name));
        }
    }

    let genre = GenreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// DELETE /api/v1/genres/{id}
///
/// Movies keep existing; they just lose this genre.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !GenreRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(genre_id = id, "Genre deleted");
    Ok(Json(DataResponse { data: id }))
}
