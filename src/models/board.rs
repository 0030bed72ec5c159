use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

/// Columns created for an empty board, with their display colors.
pub const DEFAULT_COLUMNS: [(&str, &str); 5] = [
    ("Artwork Needed", "#ef4444"),
    ("In Progress", "#f59e0b"),
    ("Proof Sent", "#3b82f6"),
    ("Changes Requested", "#8b5cf6"),
    ("Approved", "#10b981"),
];

/// Stable id of the `index`th default column. Seeding with fixed ids lets a
/// concurrent first visit insert nothing instead of a second set of columns.
pub fn default_column_id(index: usize) -> Uuid {
    Uuid::from_u128(0x5a65_c01d_0000_4000_8000_0000_0000_0000 | index as u128)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0} is not on the board")]
    UnknownId(Uuid),
    #[error("{0} appears more than once")]
    DuplicateId(Uuid),
}

/// Moves `id` inside one ordered list. The index is clamped to the list
/// length. Returns `false` when `id` is not present.
pub fn move_within(ids: &mut Vec<Uuid>, id: Uuid, to_index: usize) -> bool {
    let Some(from) = ids.iter().position(|x| *x == id) else {
        return false;
    };
    let item = ids.remove(from);
    let index = to_index.min(ids.len());
    ids.insert(index, item);
    true
}

/// Moves `id` from `source` to `target` at `to_index` (clamped).
pub fn move_between(source: &mut Vec<Uuid>, target: &mut Vec<Uuid>, id: Uuid, to_index: usize) -> bool {
    let Some(from) = source.iter().position(|x| *x == id) else {
        return false;
    };
    let item = source.remove(from);
    let index = to_index.min(target.len());
    target.insert(index, item);
    true
}

/// Applies a requested ordering to `current`. Ids the request leaves out
/// keep their relative order after the requested ones.
pub fn reorder(current: &[Uuid], requested: &[Uuid]) -> Result<Vec<Uuid>, BoardError> {
    let known: HashSet<Uuid> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !known.contains(id) {
            return Err(BoardError::UnknownId(*id));
        }
        if !seen.insert(*id) {
            return Err(BoardError::DuplicateId(*id));
        }
    }

    let mut ordered = requested.to_vec();
    ordered.extend(current.iter().filter(|id| !seen.contains(*id)));
    Ok(ordered)
}

/// Positions for an ordered list: `(id, index)` starting at 0.
pub fn positions(ids: &[Uuid]) -> impl Iterator<Item = (Uuid, i32)> + '_ {
    ids.iter().enumerate().map(|(i, id)| (*id, i as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn default_column_ids_are_stable_and_distinct() {
        let first: HashSet<Uuid> = (0..DEFAULT_COLUMNS.len()).map(default_column_id).collect();
        assert_eq!(first.len(), DEFAULT_COLUMNS.len());
        assert_eq!(default_column_id(2), default_column_id(2));
    }

    #[test]
    fn move_within_clamps_index() {
        let mut list = ids(3);
        let first = list[0];
        assert!(move_within(&mut list, first, 99));
        assert_eq!(list[2], first);
        assert!(!move_within(&mut list, Uuid::new_v4(), 0));
    }

    #[test]
    fn move_between_inserts_at_index() {
        let mut source = ids(2);
        let mut target = ids(2);
        let moving = source[1];
        assert!(move_between(&mut source, &mut target, moving, 1));
        assert_eq!(source.len(), 1);
        assert_eq!(target[1], moving);
        assert_eq!(target.len(), 3);
    }

    #[test]
    fn reorder_appends_unmentioned_ids() {
        let current = ids(3);
        let result = reorder(&current, &[current[2]]).unwrap();
        assert_eq!(result, vec![current[2], current[0], current[1]]);
    }

    #[test]
    fn reorder_rejects_unknown_and_duplicate_ids() {
        let current = ids(2);
        let stranger = Uuid::new_v4();
        assert_eq!(
            reorder(&current, &[stranger]),
            Err(BoardError::UnknownId(stranger))
        );
        assert_eq!(
            reorder(&current, &[current[0], current[0]]),
            Err(BoardError::DuplicateId(current[0]))
        );
    }

    #[test]
    fn positions_are_contiguous_from_zero() {
        let list = ids(4);
        let pos: Vec<i32> = positions(&list).map(|(_, p)| p).collect();
        assert_eq!(pos, vec![0, 1, 2, 3]);
    }
}
