//! Handlers for the `/directors` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::types::DbId;
use marquee_db::models::director::{CreateDirector, UpdateDirector};
use marquee_db::repositories::{DirectorRepo, MovieRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Director",
        id,
    })
}

/// GET /api/v1/directors
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let directors = DirectorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: directors }))
}

/// GET /api/v1/directors/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let director = DirectorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: director }))
}

/// POST /api/v1/directors
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDirector>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let director = DirectorRepo::create(&state.pool, &input).await?;
    tracing::info!(director_id = director.id, "Director created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: director })))
}

/// PATCH /api/v1/directors/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDirector>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let director = DirectorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: director }))
}

/// DELETE /api/v1/directors/{id}
///
/// Refused with 409 while any movie still references the director.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    DirectorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let movie_count = MovieRepo::count_by_director(&state.pool, id).await?;
    if movie_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Director {id} is still referenced by {movie_count} movie(s)"
        ))));
    }

    // A movie created after the count check trips the foreign key instead (409).
    if !DirectorRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(director_id = id, "Director deleted");
    Ok(Json(DataResponse { data: id }))
}
