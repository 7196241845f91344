//! Multi-key sort specifications for movie listings.
//!
//! A request carries its ordering as a list of `field_DIRECTION` strings,
//! e.g. `["title_ASC", "created_at_DESC"]`. [`SortSpec::parse`] turns that
//! into an ordered list of [`SortKey`]s whose last key is always `id`, so
//! every ordering is total and seek pagination never skips or repeats rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default ordering when the request does not specify one.
pub const DEFAULT_ORDER: &str = "id_DESC";

/// A movie column that listings may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a field name. Both `snake_case` and `camelCase` spellings are accepted.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortField::Id),
            "title" => Some(SortField::Title),
            "created_at" | "createdAt" => Some(SortField::CreatedAt),
            "updated_at" | "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Fully qualified column in the movie listing query (`movies` aliased as `m`).
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "m.id",
            SortField::Title => "m.title",
            SortField::CreatedAt => "m.created_at",
            SortField::UpdatedAt => "m.updated_at",
        }
    }
}

/// Sort direction of a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// Parse `ASC` / `DESC`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Comparison operator selecting rows strictly after a position.
    pub fn seek_operator(self) -> &'static str {
        match self {
            SortDirection::Asc => ">",
            SortDirection::Desc => "<",
        }
    }
}

/// One `(field, direction)` pair of a sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse a `field_DIRECTION` string such as `title_ASC` or `created_at_DESC`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || {
            CoreError::Validation(format!(
                "Invalid sort key '{raw}': expected <field>_<ASC|DESC> \
                 with field one of id, title, created_at, updated_at"
            ))
        };

        let (field, direction) = raw.trim().rsplit_once('_').ok_or_else(invalid)?;
        let field = SortField::parse(field).ok_or_else(invalid)?;
        let direction = SortDirection::parse(direction).ok_or_else(invalid)?;
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.field.as_str(), self.direction.as_sql())
    }
}

/// An ordered, total sort specification.
///
/// Invariants: non-empty, no field appears twice, and the last key is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Parse a list of `field_DIRECTION` strings.
    ///
    /// An empty list yields the default `[id_DESC]`. When `id` is absent it is
    /// appended with the direction of the last key; keys listed after `id`
    /// cannot affect the ordering and are dropped.
    pub fn parse<S: AsRef<str>>(order: &[S]) -> Result<Self, CoreError> {
        if order.is_empty() {
            return Ok(Self::default());
        }

        let mut keys: Vec<SortKey> = Vec::with_capacity(order.len() + 1);
        for raw in order {
            let key = SortKey::parse(raw.as_ref())?;
            if keys.iter().any(|k| k.field == key.field) {
                return Err(CoreError::Validation(format!(
                    "Sort field '{}' specified more than once",
                    key.field.as_str()
                )));
            }
            keys.push(key);
            if key.field == SortField::Id {
                break;
            }
        }

        if let Some(last) = keys.last().copied() {
            if last.field != SortField::Id {
                keys.push(SortKey::new(SortField::Id, last.direction));
            }
        }

        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Keys preceding the trailing `id` tie-breaker.
    pub fn leading_keys(&self) -> &[SortKey] {
        &self.keys[..self.keys.len() - 1]
    }

    /// The trailing `id` tie-breaker.
    pub fn id_key(&self) -> SortKey {
        self.keys[self.keys.len() - 1]
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            keys: vec![SortKey::new(SortField::Id, SortDirection::Desc)],
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
