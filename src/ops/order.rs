//! Execution order for a batch.
//!
//! Operations are sorted by source path length, longest first, so entries
//! nested inside a directory are moved before the directory itself. Sorting
//! is stable: equal lengths keep input order.
//!
//! Known gap: length is only a stand-in for tree depth. A shallow path with a
//! long name can sort ahead of a deeper one, and chains where one operation's
//! destination is another's source are not reordered. `find_batch_collisions`
//! reports the latter so the operator sees them before anything runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::operation::Operation;

/// Sort in place, longest source path first.
pub fn order_operations(ops: &mut [Operation]) {
    ops.sort_by(|a, b| path_len(b.source()).cmp(&path_len(a.source())));
}

#[inline]
fn path_len(p: &Path) -> usize {
    p.as_os_str().len()
}

/// A destination clash between two operations of the same (ordered) batch.
/// Indices refer to positions in the ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCollision {
    /// `op`'s destination is the source of `pending`, which runs later.
    DestinationIsPendingSource {
        op: usize,
        pending: usize,
        path: PathBuf,
    },
    /// Two operations want the same destination.
    SharedDestination {
        first: usize,
        second: usize,
        path: PathBuf,
    },
}

/// Report destination/source and destination/destination clashes.
pub fn find_batch_collisions(ops: &[Operation]) -> Vec<BatchCollision> {
    let mut sources: HashMap<&Path, usize> = HashMap::with_capacity(ops.len());
    for (i, op) in ops.iter().enumerate() {
        sources.entry(op.source()).or_insert(i);
    }

    let mut found = Vec::new();
    let mut destinations: HashMap<&Path, usize> = HashMap::with_capacity(ops.len());
    for (i, op) in ops.iter().enumerate() {
        let dest = op.destination();
        if let Some(&j) = sources.get(dest)
            && j > i
        {
            found.push(BatchCollision::DestinationIsPendingSource {
                op: i,
                pending: j,
                path: dest.to_path_buf(),
            });
        }
        if let Some(&first) = destinations.get(dest) {
            found.push(BatchCollision::SharedDestination {
                first,
                second: i,
                path: dest.to_path_buf(),
            });
        } else {
            destinations.insert(dest, i);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ChangeRecord;

    fn op(src: &str, dst: &str) -> Operation {
        Operation::new(ChangeRecord::new(src, dst))
    }

    #[test]
    fn children_before_parents() {
        let mut ops = vec![op("a", "z"), op("a/b.txt", "a/c.txt"), op("a/b", "a/d")];
        order_operations(&mut ops);
        let order: Vec<_> = ops.iter().map(|o| o.source().to_path_buf()).collect();
        assert_eq!(
            order,
            vec![
                PathBuf::from("a/b.txt"),
                PathBuf::from("a/b"),
                PathBuf::from("a")
            ]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let mut ops = vec![op("x1", "y1"), op("x2", "y2"), op("x3", "y3")];
        order_operations(&mut ops);
        let order: Vec<_> = ops.iter().map(|o| o.source().to_path_buf()).collect();
        assert_eq!(
            order,
            vec![PathBuf::from("x1"), PathBuf::from("x2"), PathBuf::from("x3")]
        );
    }

    #[test]
    fn detects_chain_and_shared_destination() {
        let ops = vec![op("aa", "b"), op("cc", "b"), op("b", "d")];
        let found = find_batch_collisions(&ops);
        assert!(found.contains(&BatchCollision::DestinationIsPendingSource {
            op: 0,
            pending: 2,
            path: PathBuf::from("b"),
        }));
        assert!(found.contains(&BatchCollision::SharedDestination {
            first: 0,
            second: 1,
            path: PathBuf::from("b"),
        }));
    }

    #[test]
    fn already_vacated_source_is_not_reported() {
        // "long" runs first and frees its path before "s" targets it.
        let ops = vec![op("long", "other"), op("s", "long")];
        assert!(find_batch_collisions(&ops).is_empty());
    }
}
