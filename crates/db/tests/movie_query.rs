//! Integration tests for the paginated movie listing.

mod common;

use std::collections::HashSet;

use assert_matches::assert_matches;
use common::{new_movie, seed_director, seed_genres};
use marquee_core::cursor::MAX_CURSOR_LEN;
use marquee_core::error::CoreError;
use marquee_core::types::MAX_TITLE_LEN;
use marquee_db::catalog::{MovieQuery, MovieWriter};
use marquee_db::error::DbError;
use marquee_db::models::movie::{MovieListQuery, UpdateMovie};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seed movies with the given titles, in order. Returns their ids.
async fn seed_movies(pool: &PgPool, titles: &[&str]) -> Vec<i64> {
    let director_id = seed_director(pool, "Denis Villeneuve").await;
    let genres = seed_genres(pool, &["Drama", "Sci-Fi"]).await;

    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        let movie = MovieWriter::create(pool, &new_movie(title, director_id, genres.clone()))
            .await
            .unwrap();
        ids.push(movie.id);
    }
    ids
}

fn query(order: &[&str], take: i64) -> MovieListQuery {
    MovieListQuery {
        order: order.iter().map(|s| s.to_string()).collect(),
        take: Some(take),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_order_is_id_desc(pool: PgPool) {
    let ids = seed_movies(&pool, &["Arrival", "Dune", "Sicario"]).await;

    let page = MovieQuery::list(&pool, &MovieListQuery::default())
        .await
        .unwrap();

    let returned: Vec<i64> = page.data.iter().map(|m| m.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(returned, expected);
    assert_eq!(page.count, 3);
    assert!(page.next_cursor.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_asc_pagination_visits_every_row_once(pool: PgPool) {
    seed_movies(
        &pool,
        &["Sicario", "Arrival", "Prisoners", "Dune", "Enemy", "Incendies", "Blade Runner 2049"],
    )
    .await;

    let mut request = query(&["title_ASC"], 2);
    let mut seen: Vec<String> = Vec::new();
    let mut pages = 0;

    loop {
        let page = MovieQuery::list(&pool, &request).await.unwrap();
        assert!(page.data.len() <= 2);
        assert_eq!(page.count, 7, "count must not depend on the cursor");
        seen.extend(page.data.iter().map(|m| m.title.clone()));
        pages += 1;

        match page.next_cursor {
            Some(cursor) => request.cursor = Some(cursor),
            None => break,
        }
        assert!(pages < 10, "pagination did not terminate");
    }

    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted, "rows must come back in ascending title order");
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 7);
    assert_eq!(seen.len(), 7);
    assert_eq!(pages, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ties_are_broken_by_id(pool: PgPool) {
    let ids = seed_movies(&pool, &["A", "B", "C", "D", "E"]).await;

    // Force identical created_at values so only the id separates rows.
    sqlx::query("UPDATE movies SET created_at = '2024-01-01T00:00:00Z'")
        .execute(&pool)
        .await
        .unwrap();

    let mut request = query(&["created_at_DESC"], 2);
    let mut seen: Vec<i64> = Vec::new();
    loop {
        let page = MovieQuery::list(&pool, &request).await.unwrap();
        seen.extend(page.data.iter().map(|m| m.id));
        match page.next_cursor {
            Some(cursor) => request.cursor = Some(cursor),
            None => break,
        }
    }

    let mut expected = ids;
    expected.reverse();
    assert_eq!(seen, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_exact_page_boundary_has_no_next_cursor(pool: PgPool) {
    seed_movies(&pool, &["Arrival", "Dune"]).await;

    let page = MovieQuery::list(&pool, &query(&["title_ASC"], 2))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert!(page.next_cursor.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_filter_is_case_sensitive_substring(pool: PgPool) {
    seed_movies(&pool, &["Dune", "Dune: Part Two", "dune (lowercase)", "Arrival"]).await;

    let request = MovieListQuery {
        title: Some("Dune".to_string()),
        order: vec!["title_ASC".to_string()],
        ..Default::default()
    };
    let page = MovieQuery::list(&pool, &request).await.unwrap();

    let titles: Vec<&str> = page.data.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Dune: Part Two"]);
    assert_eq!(page.count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_filter_matches_wildcards_literally(pool: PgPool) {
    seed_movies(&pool, &["100% Wolf", "1000 Wolves", "A_B", "AxB"]).await;

    let percent = MovieListQuery {
        title: Some("100%".to_string()),
        ..Default::default()
    };
    let page = MovieQuery::list(&pool, &percent).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].title, "100% Wolf");

    let underscore = MovieListQuery {
        title: Some("A_B".to_string()),
        ..Default::default()
    };
    let page = MovieQuery::list(&pool, &underscore).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].title, "A_B");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cursor_for_other_ordering_is_rejected(pool: PgPool) {
    seed_movies(&pool, &["Arrival", "Dune", "Enemy"]).await;

    let first = MovieQuery::list(&pool, &query(&["title_ASC"], 1))
        .await
        .unwrap();
    let cursor = first.next_cursor.unwrap();

    let mut request = query(&["created_at_ASC"], 1);
    request.cursor = Some(cursor);
    let result = MovieQuery::list(&pool, &request).await;

    assert_matches!(result, Err(DbError::Domain(CoreError::InvalidCursor(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cursor_for_reversed_ordering_is_rejected(pool: PgPool) {
    seed_movies(&pool, &["Arrival", "Dune", "Enemy"]).await;

    let first = MovieQuery::list(&pool, &query(&["title_ASC"], 1))
        .await
        .unwrap();

    let mut request = query(&["title_DESC"], 1);
    request.cursor = first.next_cursor;
    let result = MovieQuery::list(&pool, &request).await;

    assert_matches!(result, Err(DbError::Domain(CoreError::InvalidCursor(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_longest_titles_page_through_title_order(pool: PgPool) {
    // Control characters take the most room once JSON-escaped in a cursor.
    let titles: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|first| format!("{first}{}", "\u{1}".repeat(MAX_TITLE_LEN - 1)))
        .collect();
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let ids = seed_movies(&pool, &title_refs).await;

    let mut request = query(&["title_ASC", "created_at_DESC"], 1);
    let mut seen: Vec<i64> = Vec::new();
    loop {
        let page = MovieQuery::list(&pool, &request).await.unwrap();
        seen.extend(page.data.iter().map(|m| m.id));

        match page.next_cursor {
            Some(cursor) => {
                assert!(cursor.len() <= MAX_CURSOR_LEN);
                request.cursor = Some(cursor);
            }
            None => break,
        }
        assert!(seen.len() < 10, "pagination did not terminate");
    }

    assert_eq!(seen, ids);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_over_max_length_is_refused_by_schema(pool: PgPool) {
    let director_id = seed_director(&pool, "Denis Villeneuve").await;
    let genres = seed_genres(&pool, &["Drama"]).await;

    let too_long = "x".repeat(MAX_TITLE_LEN + 1);
    let result = MovieWriter::create(&pool, &new_movie(&too_long, director_id, genres)).await;

    assert_matches!(result, Err(DbError::Store(_)));
    assert_eq!(common::row_count(&pool, "movies").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_cursor_is_rejected(pool: PgPool) {
    let mut request = query(&[], 5);
    request.cursor = Some("%%%not-a-cursor%%%".to_string());

    let result = MovieQuery::list(&pool, &request).await;
    assert_matches!(result, Err(DbError::Domain(CoreError::InvalidCursor(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_order_is_a_validation_error(pool: PgPool) {
    let result = MovieQuery::list(&pool, &query(&["rating_DESC"], 5)).await;
    assert_matches!(result, Err(DbError::Domain(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_take_is_clamped(pool: PgPool) {
    seed_movies(&pool, &["A", "B", "C"]).await;

    let page = MovieQuery::list(&pool, &query(&[], 0)).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(page.next_cursor.is_some());

    let page = MovieQuery::list(&pool, &query(&[], 10_000)).await.unwrap();
    assert_eq!(page.data.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rows_inserted_before_cursor_do_not_shift_pages(pool: PgPool) {
    let director_id = seed_director(&pool, "Denis Villeneuve").await;
    let genres = seed_genres(&pool, &["Drama"]).await;
    for title in ["B", "D", "F"] {
        MovieWriter::create(&pool, &new_movie(title, director_id, genres.clone()))
            .await
            .unwrap();
    }

    let first = MovieQuery::list(&pool, &query(&["title_ASC"], 2))
        .await
        .unwrap();
    let titles: Vec<&str> = first.data.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "D"]);

    // A row sorting before the cursor must not push "D" onto the next page.
    MovieWriter::create(&pool, &new_movie("A", director_id, genres.clone()))
        .await
        .unwrap();

    let mut request = query(&["title_ASC"], 2);
    request.cursor = first.next_cursor;
    let second = MovieQuery::list(&pool, &request).await.unwrap();
    let titles: Vec<&str> = second.data.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["F"]);
    assert_eq!(second.count, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_reflects_updates(pool: PgPool) {
    let ids = seed_movies(&pool, &["Arrival", "Dune"]).await;
    let genres = seed_genres(&pool, &["Thriller"]).await;

    let patch = UpdateMovie {
        genre_ids: Some(genres.clone()),
        ..Default::default()
    };
    MovieWriter::update(&pool, ids[0], &patch).await.unwrap();

    let page = MovieQuery::list(&pool, &query(&["id_ASC"], 5)).await.unwrap();
    assert_eq!(page.data[0].genre_ids(), genres);
    assert_eq!(page.data[0].version, 2);
    assert_eq!(page.data[1].genres.len(), 2);
}
