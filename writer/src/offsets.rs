//! Bookkeeping of the size changes made by a batch of edits.
//!
//! Each edit records the data offset of the edited value
//! (as it was before the batch started)
//! and the number of bytes the value grew or shrank by.
//! Any position after that offset is then off by that amount,
//! until the batch is finished and every directory entry is corrected.

/// A size change at a given position of the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OffsetChange {
    /// The data offset of the edited value,
    /// in the layout from before the current batch of edits.
    pub offset: usize,
    /// The signed number of bytes added at this offset.
    ///
    /// In a cumulative view,
    /// this is the number of bytes added at this offset and all offsets before it.
    pub change: isize,
}

/// Sum the changes made before the given position.
pub(crate) fn pending_correction(changes: &[OffsetChange], position: usize) -> isize {
    changes
        .iter()
        .filter(|c| c.offset < position)
        .map(|c| c.change)
        .sum()
}

/// Sort the changes by offset
/// and build their running sum.
pub(crate) fn accumulate(changes: &mut [OffsetChange]) -> Vec<OffsetChange> {
    changes.sort_by_key(|c| c.offset);
    let mut total = 0;
    changes
        .iter()
        .map(|c| {
            total += c.change;
            OffsetChange {
                offset: c.offset,
                change: total,
            }
        })
        .collect()
}

/// Look up the cumulative change for the given position
/// in the output of [`accumulate`].
pub(crate) fn total_correction(totals: &[OffsetChange], position: usize) -> isize {
    match totals.partition_point(|c| c.offset < position) {
        0 => 0,
        i => totals[i - 1].change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(offset: usize, change: isize) -> OffsetChange {
        OffsetChange { offset, change }
    }

    #[test]
    fn accumulate_sorts_and_sums() {
        let mut changes = vec![change(40, -6), change(10, 4), change(25, 2)];
        let totals = accumulate(&mut changes);
        assert_eq!(totals, vec![change(10, 4), change(25, 6), change(40, 0)]);
        assert_eq!(changes, vec![change(10, 4), change(25, 2), change(40, -6)]);
    }

    #[test]
    fn corrections_only_apply_after_the_edit() {
        let mut changes = vec![change(10, 4), change(25, 2)];
        let totals = accumulate(&mut changes);

        for (position, expected) in [(0, 0), (10, 0), (11, 4), (25, 4), (26, 6), (1000, 6)] {
            assert_eq!(total_correction(&totals, position), expected);
            assert_eq!(pending_correction(&changes, position), expected);
        }
    }

    #[test]
    fn repeated_edits_at_the_same_offset_add_up() {
        let mut changes = vec![change(10, 4), change(10, -2)];
        let totals = accumulate(&mut changes);
        assert_eq!(total_correction(&totals, 10), 0);
        assert_eq!(total_correction(&totals, 12), 2);
        assert_eq!(pending_correction(&changes, 12), 2);
    }

    #[test]
    fn no_changes() {
        assert_eq!(accumulate(&mut []), vec![]);
        assert_eq!(total_correction(&[], 10), 0);
        assert_eq!(pending_correction(&[], 10), 0);
    }
}
