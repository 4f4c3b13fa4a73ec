//! Bounded breadth-first traversal over friend edges.
//!
//! # Responsibility
//! - Collect every record reachable from a root within a hop limit.
//!
//! # Invariants
//! - The root is never part of the result.
//! - Each record appears at most once, at its shortest distance.
//! - Output is ordered by distance, then by discovery order.
//! - Edges to missing records are skipped, never fatal.

use crate::model::record::{Record, RecordId};
use crate::store::document_store::{DocumentStore, StoreError, StoreResult};
use log::warn;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Node lookup used by the traversal.
///
/// Any record container can implement this to be traversable.
pub trait FriendGraph {
    /// Returns the stored key and record for `id`, if present.
    fn node(&self, id: &str) -> Option<(&RecordId, &Record)>;
}

impl FriendGraph for DocumentStore {
    fn node(&self, id: &str) -> Option<(&RecordId, &Record)> {
        self.get_entry(id)
    }
}

/// One record reached by a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub id: RecordId,
    /// Hops from the root (always >= 1).
    pub depth: usize,
    pub record: Record,
}

/// Finds all records within `max_depth` hops of `root`.
///
/// # Errors
/// - `StoreError::NotFound` when `root` is not in the graph.
///
/// A `max_depth` of zero or less yields an empty result.
pub fn traverse<G: FriendGraph + ?Sized>(
    graph: &G,
    root: &str,
    max_depth: i64,
) -> StoreResult<Vec<Neighbor>> {
    let (root_id, root_record) = graph
        .node(root)
        .ok_or_else(|| StoreError::NotFound(RecordId::from(root)))?;

    let Ok(max_depth) = usize::try_from(max_depth) else {
        return Ok(Vec::new());
    };
    if max_depth == 0 {
        return Ok(Vec::new());
    }

    let mut visited: HashSet<&RecordId> = HashSet::new();
    visited.insert(root_id);
    let mut queue: VecDeque<(&Record, usize)> = VecDeque::new();
    queue.push_back((root_record, 0));
    let mut found = Vec::new();

    while let Some((record, depth)) = queue.pop_front() {
        let next_depth = depth + 1;
        for friend_id in &record.friends {
            if !visited.insert(friend_id) {
                continue;
            }

            let Some((id, friend)) = graph.node(friend_id.as_str()) else {
                warn!(
                    "event=graph_traverse module=graph status=skip reason=missing_node id={friend_id}"
                );
                continue;
            };

            found.push(Neighbor {
                id: id.clone(),
                depth: next_depth,
                record: friend.clone(),
            });

            if next_depth < max_depth {
                queue.push_back((friend, next_depth));
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::{traverse, Neighbor};
    use crate::model::record::{Record, RecordId};
    use crate::store::document_store::{DocumentStore, RecordMap, StoreError};

    /// Builds a store from `(id, friends)` pairs with fixed ids.
    fn graph(edges: &[(&str, &[&str])]) -> DocumentStore {
        let records: RecordMap = edges
            .iter()
            .map(|(id, friends)| {
                (
                    RecordId::from(*id),
                    Record::new(
                        id.to_uppercase(),
                        format!("{id}@b.net"),
                        friends.iter().map(|friend| RecordId::from(*friend)),
                    ),
                )
            })
            .collect();
        DocumentStore::from_records(records)
    }

    fn ids(found: &[Neighbor]) -> Vec<&str> {
        found.iter().map(|neighbor| neighbor.id.as_str()).collect()
    }

    #[test]
    fn two_node_scenario_returns_friend() {
        let store = graph(&[("a", &["b"]), ("b", &[])]);
        let found = traverse(&store, "a", 2).unwrap();
        assert_eq!(ids(&found), vec!["b"]);
        assert_eq!(found[0].record.name, "B");
        assert_eq!(found[0].depth, 1);
    }

    #[test]
    fn non_positive_depth_is_empty() {
        let store = graph(&[("a", &["b"]), ("b", &[])]);
        assert!(traverse(&store, "a", 0).unwrap().is_empty());
        assert!(traverse(&store, "a", -3).unwrap().is_empty());
    }

    #[test]
    fn unknown_root_is_not_found_even_at_zero_depth() {
        let store = graph(&[("a", &[])]);
        assert!(matches!(
            traverse(&store, "zzz", 0),
            Err(StoreError::NotFound(id)) if id.as_str() == "zzz"
        ));
    }

    #[test]
    fn orders_by_distance_then_discovery() {
        let store = graph(&[
            ("root", &["c", "b"]),
            ("b", &["e", "d"]),
            ("c", &["d", "f"]),
            ("d", &["g"]),
            ("e", &[]),
            ("f", &[]),
            ("g", &[]),
        ]);
        let found = traverse(&store, "root", 3).unwrap();
        assert_eq!(ids(&found), vec!["c", "b", "d", "f", "e", "g"]);
        let depths: Vec<usize> = found.iter().map(|neighbor| neighbor.depth).collect();
        assert_eq!(depths, vec![1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn respects_hop_limit() {
        let store = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &[])]);
        assert_eq!(ids(&traverse(&store, "a", 1).unwrap()), vec!["b"]);
        assert_eq!(ids(&traverse(&store, "a", 2).unwrap()), vec!["b", "c"]);
        assert_eq!(ids(&traverse(&store, "a", 10).unwrap()), vec!["b", "c", "d"]);
    }

    #[test]
    fn cycles_and_self_edges_never_repeat_or_include_root() {
        let store = graph(&[("a", &["a", "b", "b"]), ("b", &["a", "c"]), ("c", &["b"])]);
        let found = traverse(&store, "a", 5).unwrap();
        assert_eq!(ids(&found), vec!["b", "c"]);
    }

    #[test]
    fn edges_are_directed() {
        let store = graph(&[("a", &[]), ("b", &["a"])]);
        assert!(traverse(&store, "a", 3).unwrap().is_empty());
    }

    #[test]
    fn missing_neighbors_are_skipped() {
        let store = graph(&[("a", &["ghost", "b"]), ("b", &["ghost"])]);
        let found = traverse(&store, "a", 3).unwrap();
        assert_eq!(ids(&found), vec!["b"]);
    }

    #[test]
    fn result_size_grows_monotonically_with_depth() {
        let store = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d", "e"]),
            ("d", &["a"]),
            ("e", &["f"]),
            ("f", &[]),
        ]);
        let mut previous = 0;
        for depth in 0..6 {
            let size = traverse(&store, "a", depth).unwrap().len();
            assert!(size >= previous);
            previous = size;
        }
        assert_eq!(previous, 5);
    }
}
