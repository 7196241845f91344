//! Opaque seek-pagination cursors.
//!
//! A cursor records the sort-key values of the last row a client has seen,
//! plus that row's id as the final tie-breaker. The token is URL-safe base64
//! (no padding) over a small JSON document:
//!
//! ```text
//! {"keys":[{"field":"title","direction":"ASC","value":{"type":"text","value":"Dune"}}],
//!  "id":12,"id_direction":"ASC"}
//! ```
//!
//! Values are tagged with their type so integers, text and timestamps survive
//! a round trip unchanged. Directions are recorded so a cursor cannot be
//! replayed under the reverse ordering.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sort::{SortDirection, SortField, SortKey, SortSpec};
use crate::types::{DbId, Timestamp, MAX_TITLE_LEN};

/// Worst-case JSON size of one title character: a control character is
/// escaped as `\u00XX`.
const MAX_ESCAPED_CHAR_BYTES: usize = 6;

/// Room for everything in the payload except the title text: up to three
/// leading keys with their tags, directions and timestamps, plus the id.
const CURSOR_ENVELOPE_BYTES: usize = 512;

/// Upper bound on an encoded cursor. Any valid row encodes within it; longer
/// input is rejected before decoding.
pub const MAX_CURSOR_LEN: usize =
    (MAX_TITLE_LEN * MAX_ESCAPED_CHAR_BYTES + CURSOR_ENVELOPE_BYTES).div_ceil(3) * 4;

/// A typed sort-key value captured from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CursorValue {
    Int(i64),
    Text(String),
    Timestamp(Timestamp),
}

impl CursorValue {
    fn matches(&self, field: SortField) -> bool {
        matches!(
            (field, self),
            (SortField::Id, CursorValue::Int(_))
                | (SortField::Title, CursorValue::Text(_))
                | (SortField::CreatedAt, CursorValue::Timestamp(_))
                | (SortField::UpdatedAt, CursorValue::Timestamp(_))
        )
    }
}

/// A row that can be positioned by a cursor.
pub trait CursorSource {
    fn cursor_id(&self) -> DbId;

    /// The row's value for a sort field.
    fn cursor_value(&self, field: SortField) -> CursorValue;
}

/// Decoded cursor: the leading sort keys with their values, plus the row id
/// and the direction of the `id` tie-breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPosition {
    pub values: Vec<(SortKey, CursorValue)>,
    pub id: DbId,
    pub id_direction: SortDirection,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CursorEntry {
    field: SortField,
    direction: SortDirection,
    value: CursorValue,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CursorPayload {
    keys: Vec<CursorEntry>,
    id: DbId,
    id_direction: SortDirection,
}

/// Encode the position of `row` under `spec`.
pub fn encode<R: CursorSource + ?Sized>(row: &R, spec: &SortSpec) -> String {
    let position = CursorPosition {
        values: spec
            .leading_keys()
            .iter()
            .map(|k| (*k, row.cursor_value(k.field)))
            .collect(),
        id: row.cursor_id(),
        id_direction: spec.id_key().direction,
    };
    position.encode()
}

/// Decode a token produced by [`encode`].
pub fn decode(token: &str) -> Result<CursorPosition, CoreError> {
    CursorPosition::decode(token)
}

impl CursorPosition {
    pub fn encode(&self) -> String {
        let payload = CursorPayload {
            keys: self
                .values
                .iter()
                .map(|(key, value)| CursorEntry {
                    field: key.field,
                    direction: key.direction,
                    value: value.clone(),
                })
                .collect(),
            id: self.id,
            id_direction: self.id_direction,
        };
        // Serializing plain enums, strings and integers cannot fail.
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, CoreError> {
        if token.is_empty() || token.len() > MAX_CURSOR_LEN {
            return Err(CoreError::InvalidCursor("cursor has invalid length".into()));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CoreError::InvalidCursor(format!("not valid base64: {e}")))?;
        let payload: CursorPayload = serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::InvalidCursor(format!("malformed payload: {e}")))?;

        let mut values: Vec<(SortKey, CursorValue)> = Vec::with_capacity(payload.keys.len());
        for entry in payload.keys {
            if entry.field == SortField::Id {
                return Err(CoreError::InvalidCursor(
                    "id must only appear as the tie-breaker".into(),
                ));
            }
            if values.iter().any(|(k, _)| k.field == entry.field) {
                return Err(CoreError::InvalidCursor(format!(
                    "field '{}' appears more than once",
                    entry.field.as_str()
                )));
            }
            if !entry.value.matches(entry.field) {
                return Err(CoreError::InvalidCursor(format!(
                    "value for '{}' has the wrong type",
                    entry.field.as_str()
                )));
            }
            values.push((SortKey::new(entry.field, entry.direction), entry.value));
        }

        Ok(Self {
            values,
            id: payload.id,
            id_direction: payload.id_direction,
        })
    }

    /// Ensure this cursor was issued for the same ordering as `spec`,
    /// directions included.
    pub fn check_against(&self, spec: &SortSpec) -> Result<(), CoreError> {
        let same_ordering = self.values.len() == spec.leading_keys().len()
            && self
                .values
                .iter()
                .zip(spec.leading_keys())
                .all(|((issued, _), key)| issued == key)
            && self.id_direction == spec.id_key().direction;

        if same_ordering {
            Ok(())
        } else {
            let issued: Vec<String> = self
                .values
                .iter()
                .map(|(k, _)| k.to_string())
                .chain(std::iter::once(
                    SortKey::new(SortField::Id, self.id_direction).to_string(),
                ))
                .collect();
            Err(CoreError::InvalidCursor(format!(
                "cursor was issued for ordering {} but the request orders by {spec}",
                issued.join(",")
            )))
        }
    }
}
