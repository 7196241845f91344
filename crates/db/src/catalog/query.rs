//! Filtered, sorted, seek-paginated movie listing.
//!
//! Pages are addressed by an opaque cursor holding the sort-key values of
//! the last row served. The next page is every row strictly after that
//! position under the requested ordering, so concurrent inserts never shift
//! rows between pages the way an offset would.

use marquee_core::cursor::{self, CursorPosition, CursorValue};
use marquee_core::pagination::clamp_page_size;
use marquee_core::sort::SortSpec;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DbResult;
use crate::models::movie::{MovieListQuery, MoviePage, MovieView, MovieViewRow};
use crate::repositories::movie_repo::VIEW_SELECT;

/// Read-only listing over the hydrated movie view.
pub struct MovieQuery;

impl MovieQuery {
    /// List one page of movies.
    ///
    /// A cursor issued for a different ordering is rejected with
    /// `InvalidCursor`. `count` reflects the title filter only.
    pub async fn list(pool: &PgPool, request: &MovieListQuery) -> DbResult<MoviePage> {
        let spec = SortSpec::parse(&request.order)?;
        let take = clamp_page_size(request.take);

        let position = match request.cursor.as_deref().filter(|c| !c.is_empty()) {
            Some(token) => {
                let position = cursor::decode(token)?;
                position.check_against(&spec)?;
                Some(position)
            }
            None => None,
        };

        let pattern = request
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", escape_like(t)));

        let mut page_query = build_page_query(pattern.as_deref(), &spec, position.as_ref(), take);
        let rows = page_query
            .build_query_as::<MovieViewRow>()
            .fetch_all(pool)
            .await?;

        let has_more = rows.len() as i64 > take;
        let data: Vec<MovieView> = rows
            .into_iter()
            .take(take as usize)
            .map(MovieView::from)
            .collect();
        let next_cursor = if has_more {
            data.last().map(|last| cursor::encode(last, &spec))
        } else {
            None
        };

        let mut count_query = build_count_query(pattern.as_deref());
        let count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await?;

        tracing::debug!(
            order = %spec,
            take,
            returned = data.len(),
            count,
            has_more,
            "Listed movies"
        );

        Ok(MoviePage {
            data,
            next_cursor,
            count,
        })
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Page query: filter, seek predicate, ordering and a `take + 1` limit.
pub(crate) fn build_page_query(
    pattern: Option<&str>,
    spec: &SortSpec,
    position: Option<&CursorPosition>,
    take: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
    qb.push(" WHERE 1=1");
    push_title_filter(&mut qb, pattern);

    if let Some(position) = position {
        qb.push(" AND (");
        push_seek_predicate(&mut qb, spec, position);
        qb.push(")");
    }

    qb.push(" ORDER BY ");
    for (i, key) in spec.keys().iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(key.field.column());
        qb.push(" ");
        qb.push(key.direction.as_sql());
    }

    qb.push(" LIMIT ");
    qb.push_bind(take + 1);
    qb
}

fn build_count_query(pattern: Option<&str>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movies m WHERE 1=1");
    push_title_filter(&mut qb, pattern);
    qb
}

fn push_title_filter(qb: &mut QueryBuilder<'static, Postgres>, pattern: Option<&str>) {
    if let Some(pattern) = pattern {
        qb.push(" AND m.title LIKE ");
        qb.push_bind(pattern.to_owned());
        qb.push(" ESCAPE '\\'");
    }
}

/// Lexicographic "strictly after" over every sort key, `id` last:
///
/// ```text
/// (k1 > v1) OR (k1 = v1 AND k2 < v2) OR (k1 = v1 AND k2 = v2 AND id < i)
/// ```
///
/// Each key compares with `>` when ascending and `<` when descending.
fn push_seek_predicate(
    qb: &mut QueryBuilder<'static, Postgres>,
    spec: &SortSpec,
    position: &CursorPosition,
) {
    let id_value = CursorValue::Int(position.id);
    let values: Vec<&CursorValue> = position
        .values
        .iter()
        .map(|(_, v)| v)
        .chain(std::iter::once(&id_value))
        .collect();

    for (i, key) in spec.keys().iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push("(");
        for (prior, value) in spec.keys()[..i].iter().zip(&values) {
            qb.push(prior.field.column());
            qb.push(" = ");
            push_value(qb, value);
            qb.push(" AND ");
        }
        qb.push(key.field.column());
        qb.push(" ");
        qb.push(key.direction.seek_operator());
        qb.push(" ");
        push_value(qb, values[i]);
        qb.push(")");
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &CursorValue) {
    match value {
        CursorValue::Int(v) => qb.push_bind(*v),
        CursorValue::Text(v) => qb.push_bind(v.clone()),
        CursorValue::Timestamp(v) => qb.push_bind(*v),
    };
}
