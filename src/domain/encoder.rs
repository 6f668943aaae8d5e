//! Prüfer encoding: the inverse of decoding

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::sequence::PrueferSequence;
use crate::domain::tree::LabeledTree;

/// Encodes a spanning tree on `1..=n` as its Prüfer sequence.
///
/// Repeatedly removes the smallest remaining leaf and records its neighbor
/// until two vertices are left.
///
/// # Errors
/// `DomainError::NotATree` if `tree` has fewer than two vertices or is not a
/// spanning tree over its labels.
#[instrument(level = "debug", skip(tree), fields(n = tree.vertex_count()))]
pub fn encode(tree: &LabeledTree) -> DomainResult<PrueferSequence> {
    let n = tree.vertex_count();
    if n < 2 {
        return Err(DomainError::NotATree {
            vertex_count: n,
            reason: "a Prüfer sequence needs at least two vertices".to_string(),
        });
    }
    if !tree.is_spanning_tree() {
        return Err(DomainError::NotATree {
            vertex_count: n,
            reason: format!("{} edges do not form a spanning tree", tree.edge_count()),
        });
    }

    let adjacency = tree.adjacency();
    let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut removed = vec![false; n + 1];
    let mut leaves: BinaryHeap<Reverse<usize>> = (1..=n)
        .filter(|&v| degree[v] == 1)
        .map(Reverse)
        .collect();

    let mut labels = Vec::with_capacity(n - 2);
    while labels.len() < n - 2 {
        let Reverse(leaf) = leaves.pop().ok_or_else(|| DomainError::NotATree {
            vertex_count: n,
            reason: "ran out of leaves".to_string(),
        })?;
        let neighbor = adjacency[leaf]
            .iter()
            .copied()
            .find(|&u| !removed[u])
            .ok_or_else(|| DomainError::NotATree {
                vertex_count: n,
                reason: format!("leaf {} has no remaining neighbor", leaf),
            })?;
        removed[leaf] = true;
        labels.push(neighbor);
        degree[neighbor] -= 1;
        if degree[neighbor] == 1 {
            leaves.push(Reverse(neighbor));
        }
    }

    PrueferSequence::new(labels)
}
