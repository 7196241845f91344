//! Fixtures shared by the database integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use marquee_core::types::DbId;
use marquee_db::models::director::CreateDirector;
use marquee_db::models::genre::CreateGenre;
use marquee_db::models::movie::CreateMovie;
use marquee_db::repositories::{DirectorRepo, GenreRepo};
use sqlx::PgPool;

pub async fn seed_director(pool: &PgPool, name: &str) -> DbId {
    DirectorRepo::create(
        pool,
        &CreateDirector {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(1967, 10, 3).unwrap(),
            nationality: "Canadian".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_genre(pool: &PgPool, name: &str) -> DbId {
    GenreRepo::create(
        pool,
        &CreateGenre {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Seed genres in order; with a fresh database they get ids 1, 2, 3, ...
pub async fn seed_genres(pool: &PgPool, names: &[&str]) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(seed_genre(pool, name).await);
    }
    ids
}

pub fn new_movie(title: &str, director_id: DbId, genre_ids: Vec<DbId>) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        detail: format!("{title}: the detail"),
        director_id,
        genre_ids,
    }
}

pub async fn row_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
