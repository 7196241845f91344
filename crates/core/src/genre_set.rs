//! Resolution of requested genre ids against the ids that actually exist.

use crate::error::{CoreError, ReferenceKind};
use crate::types::DbId;

/// Sort and de-duplicate requested ids.
pub fn distinct_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut distinct = ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
}

/// Requested ids (already distinct) that are absent from `found`, ascending.
pub fn missing_ids(requested: &[DbId], found: &[DbId]) -> Vec<DbId> {
    let mut missing: Vec<DbId> = requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    missing.sort_unstable();
    missing
}

/// Fail with `ReferenceNotFound` unless every requested id was found.
///
/// The resolved set must be exactly as large as the distinct request; a
/// partial match is never silently attached.
pub fn ensure_all_found(
    kind: ReferenceKind,
    requested: &[DbId],
    found: &[DbId],
) -> Result<(), CoreError> {
    let missing = missing_ids(requested, found);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ReferenceNotFound { kind, missing })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn distinct_ids_sorts_and_dedups() {
        assert_eq!(distinct_ids(&[5, 2, 5, 1, 2]), vec![1, 2, 5]);
        assert!(distinct_ids(&[]).is_empty());
    }

    #[test]
    fn missing_ids_lists_exactly_the_absent_ones() {
        assert_eq!(missing_ids(&[2, 5, 99], &[2, 5]), vec![99]);
        assert_eq!(missing_ids(&[7, 3, 4], &[4]), vec![3, 7]);
        assert!(missing_ids(&[1], &[1]).is_empty());
    }

    #[test]
    fn ensure_all_found_reports_kind_and_missing() {
        assert!(ensure_all_found(ReferenceKind::Genre, &[2, 5], &[5, 2]).is_ok());
        assert_matches!(
            ensure_all_found(ReferenceKind::Genre, &[2, 99], &[2]),
            Err(CoreError::ReferenceNotFound { kind: ReferenceKind::Genre, missing })
                if missing == vec![99]
        );
    }
}
