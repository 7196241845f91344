//! Shared response envelope types for API handlers.
//!
//! Single entities and plain lists use a `{ "data": ... }` envelope. The
//! movie listing returns its own `{ data, nextCursor, count }` page shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: directors }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
