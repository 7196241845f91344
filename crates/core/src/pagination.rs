//! Page-size defaults for cursor-paginated listings.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(take: Option<i64>) -> i64 {
    take.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}
