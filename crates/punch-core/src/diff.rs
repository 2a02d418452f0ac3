//! Ordered-collection reconciliation
//!
//! Computes a minimal edit script of keep/delete/insert operations that
//! transforms one ordered sequence into another, preferring to leave the
//! largest possible blocks of matched items in place so that incremental
//! display updates churn as little as possible.
//!
//! Applying the emitted script to the old sequence, in emission order, yields
//! exactly the new sequence. Moves are expressed as a delete plus an insert.

/// One step of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// The old item stays in place
    Keep { old_index: usize, new_index: usize },
    /// Remove the item at this old index
    Delete { old_index: usize },
    /// Insert the new item at this new index
    Insert { new_index: usize },
}

/// A maximal block of matches contiguous in the new sequence and strictly
/// ascending in old indices
struct Run {
    new_start: usize,
    old_indices: Vec<usize>,
}

impl Run {
    fn len(&self) -> usize {
        self.old_indices.len()
    }

    fn first_old(&self) -> usize {
        self.old_indices[0]
    }

    fn last_old(&self) -> usize {
        self.old_indices[self.old_indices.len() - 1]
    }
}

/// Compute the edit script transforming `old` into `new`
///
/// Equality is supplied by the caller; it need not be identity-based. Deletes
/// are emitted first, in descending old index, followed by keeps and inserts
/// in new-sequence order, so the script can be applied against a list that
/// starts out in old order.
pub fn diff<T, F>(old: &[T], new: &[T], eq: F) -> Vec<DiffOp>
where
    F: Fn(&T, &T) -> bool,
{
    // Match each new item to the first still-unclaimed old item, so
    // duplicates pair up one-to-one.
    let mut claimed = vec![false; old.len()];
    let mut mapping: Vec<Option<usize>> = Vec::with_capacity(new.len());
    for item in new {
        let found = (0..old.len()).find(|&i| !claimed[i] && eq(&old[i], item));
        if let Some(i) = found {
            claimed[i] = true;
        }
        mapping.push(found);
    }

    let runs = collect_runs(&mapping);
    let selected = select_runs(&runs);

    // Which old items stay, and which new positions they serve.
    let mut kept_old = vec![false; old.len()];
    let mut kept_at: Vec<Option<usize>> = vec![None; new.len()];
    for &r in &selected {
        let run = &runs[r];
        for (offset, &i) in run.old_indices.iter().enumerate() {
            kept_old[i] = true;
            kept_at[run.new_start + offset] = Some(i);
        }
    }

    let mut ops = Vec::new();
    // Descending order keeps lower indices valid while the deletes apply.
    for i in (0..old.len()).rev() {
        if !kept_old[i] {
            ops.push(DiffOp::Delete { old_index: i });
        }
    }
    for (j, slot) in kept_at.iter().enumerate() {
        match *slot {
            Some(i) => ops.push(DiffOp::Keep {
                old_index: i,
                new_index: j,
            }),
            None => ops.push(DiffOp::Insert { new_index: j }),
        }
    }
    ops
}

/// Apply an edit script produced by [`diff`] to a copy of `old`
///
/// `new` supplies the payloads for insert operations.
pub fn apply<T: Clone>(old: &[T], new: &[T], ops: &[DiffOp]) -> Vec<T> {
    let mut list = old.to_vec();
    for op in ops {
        match *op {
            DiffOp::Delete { old_index } => {
                list.remove(old_index);
            }
            DiffOp::Insert { new_index } => {
                list.insert(new_index, new[new_index].clone());
            }
            DiffOp::Keep { .. } => {}
        }
    }
    list
}

fn collect_runs(mapping: &[Option<usize>]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (j, slot) in mapping.iter().enumerate() {
        let Some(i) = *slot else { continue };
        match runs.last_mut() {
            Some(run)
                if run.new_start + run.len() == j && run.last_old() < i =>
            {
                run.old_indices.push(i);
            }
            _ => runs.push(Run {
                new_start: j,
                old_indices: vec![i],
            }),
        }
    }
    runs
}

/// Pick the compatible subset of runs with the largest combined size
///
/// Runs arrive ordered by position in the new sequence; a selection is
/// compatible when old-index ranges also strictly increase along it, so the
/// retained blocks never have to cross each other. Solved as a weighted
/// longest-chain over the runs rather than the exhaustive subset search, which
/// gives the same maximal retained size in quadratic time.
fn select_runs(runs: &[Run]) -> Vec<usize> {
    let n = runs.len();
    let mut best: Vec<usize> = vec![0; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    for r in 0..n {
        best[r] = runs[r].len();
        for p in 0..r {
            if runs[p].last_old() < runs[r].first_old() && best[p] + runs[r].len() > best[r] {
                best[r] = best[p] + runs[r].len();
                prev[r] = Some(p);
            }
        }
    }

    let Some(mut at) = (0..n).max_by_key(|&r| best[r]) else {
        return Vec::new();
    };
    let mut selected = vec![at];
    while let Some(p) = prev[at] {
        selected.push(p);
        at = p;
    }
    selected.reverse();
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check_round_trip(old: &[i32], new: &[i32]) -> Vec<DiffOp> {
        let ops = diff(old, new, |a, b| a == b);
        assert_eq!(apply(old, new, &ops), new, "old={old:?} new={new:?}");
        ops
    }

    fn edit_count(ops: &[DiffOp]) -> usize {
        ops.iter()
            .filter(|op| !matches!(op, DiffOp::Keep { .. }))
            .count()
    }

    #[test]
    fn identical_sequences_need_no_edits() {
        let ops = check_round_trip(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(edit_count(&ops), 0);
        assert_eq!(
            ops,
            vec![
                DiffOp::Keep { old_index: 0, new_index: 0 },
                DiffOp::Keep { old_index: 1, new_index: 1 },
                DiffOp::Keep { old_index: 2, new_index: 2 },
            ]
        );
    }

    #[test]
    fn pure_insert() {
        let ops = check_round_trip(&[1, 3], &[1, 2, 3]);
        assert_eq!(edit_count(&ops), 1);
        assert!(ops.contains(&DiffOp::Insert { new_index: 1 }));
    }

    #[test]
    fn pure_delete() {
        let ops = check_round_trip(&[1, 2, 3], &[1, 3]);
        assert_eq!(edit_count(&ops), 1);
        assert!(ops.contains(&DiffOp::Delete { old_index: 1 }));
    }

    #[test]
    fn empty_to_full_and_back() {
        let ops = check_round_trip(&[], &[1, 2, 3]);
        assert_eq!(edit_count(&ops), 3);
        let ops = check_round_trip(&[1, 2, 3], &[]);
        assert_eq!(edit_count(&ops), 3);
    }

    #[test]
    fn move_is_a_delete_plus_insert() {
        let ops = check_round_trip(&[1, 2, 3, 4], &[2, 3, 4, 1]);
        // The long run 2,3,4 stays; 1 moves.
        assert_eq!(edit_count(&ops), 2);
        assert!(ops.contains(&DiffOp::Delete { old_index: 0 }));
        assert!(ops.contains(&DiffOp::Insert { new_index: 3 }));
    }

    #[test]
    fn keeps_the_largest_block_on_reorder() {
        let ops = check_round_trip(&[5, 1, 2, 3], &[1, 2, 3, 5]);
        let kept: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, DiffOp::Keep { .. }))
            .collect();
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn crossing_blocks_cannot_both_be_kept() {
        // [3, 4] and [1, 2] both match but cross; only one block survives.
        check_round_trip(&[1, 2, 3, 4], &[3, 4, 1, 2]);
    }

    #[test]
    fn full_replacement() {
        let ops = check_round_trip(&[1, 2], &[3, 4]);
        assert_eq!(edit_count(&ops), 4);
    }

    #[test]
    fn duplicates_pair_one_to_one() {
        check_round_trip(&[1, 1, 2], &[1, 2, 1]);
        check_round_trip(&[2, 2, 2], &[2, 2]);
        check_round_trip(&[2, 2], &[2, 2, 2]);
    }

    #[test]
    fn interleaved_changes() {
        check_round_trip(&[1, 2, 3, 4, 5], &[2, 9, 4, 5, 1, 8]);
        check_round_trip(&[10, 20, 30], &[30, 10, 20, 40]);
        check_round_trip(&[7], &[8]);
    }

    #[test]
    fn edit_count_never_exceeds_combined_length() {
        let cases: &[(&[i32], &[i32])] = &[
            (&[1, 2, 3], &[3, 2, 1]),
            (&[1, 2, 3, 4], &[4, 3, 2, 1]),
            (&[], &[]),
            (&[1], &[1, 1, 1]),
            (&[5, 6, 7, 8], &[8, 5, 6, 7]),
        ];
        for (old, new) in cases {
            let ops = check_round_trip(old, new);
            assert!(edit_count(&ops) <= old.len() + new.len());
        }
    }

    #[test]
    fn caller_supplied_equality() {
        let old = ["Apple", "Banana"];
        let new = ["apple", "CHERRY"];
        let ops = diff(&old, &new, |a, b| a.eq_ignore_ascii_case(b));
        assert!(ops.contains(&DiffOp::Keep { old_index: 0, new_index: 0 }));
        assert!(ops.contains(&DiffOp::Delete { old_index: 1 }));
        assert!(ops.contains(&DiffOp::Insert { new_index: 1 }));
    }
}
