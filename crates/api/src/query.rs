//! Shared query parameter types for API handlers.

use marquee_db::models::movie::MovieListQuery;
use serde::Deserialize;

/// Query parameters for `GET /movies`
/// (`?title=&order=title_ASC,created_at_DESC&cursor=&take=`).
///
/// `order` is comma-separated because repeated query keys do not
/// deserialize into a list. Page-size clamping happens in the query planner.
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesParams {
    pub title: Option<String>,
    pub order: Option<String>,
    pub cursor: Option<String>,
    pub take: Option<i64>,
}

impl From<ListMoviesParams> for MovieListQuery {
    fn from(params: ListMoviesParams) -> Self {
        let order = params
            .order
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        MovieListQuery {
            title: params.title,
            order,
            cursor: params.cursor,
            take: params.take,
        }
    }
}
