//! Prüfer decoding: two independent algorithms with the same contract
//!
//! Both decoders take the labels of a Prüfer sequence and return the unique
//! labeled tree on `1..=n` (`n = len + 2`) it encodes. They agree on every
//! valid input, which makes each one an oracle for the other.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::sequence::validate_labels;
use crate::domain::tree::{Edge, LabeledTree};

/// A Prüfer decoding algorithm.
///
/// Implementations are stateless: every call works on its own local tables,
/// so a decoder can be shared freely between threads.
pub trait Decoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes `labels` into the edges of the tree it encodes.
    ///
    /// # Errors
    /// Fails fast with an invalid-sequence error (see
    /// [`DomainError::is_invalid_sequence`]) if a label lies outside `1..=n`.
    fn decode(&self, labels: &[usize]) -> DomainResult<LabeledTree>;
}

/// Reconstructs the tree from running vertex degrees.
///
/// Each vertex starts at degree 1 plus its number of occurrences. For every
/// label `a` in order, the smallest vertex of degree exactly 1 is joined to
/// `a` and both degrees drop by one. The two vertices left at degree 1 form
/// the last edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeCountingDecoder;

impl Decoder for DegreeCountingDecoder {
    fn name(&self) -> &'static str {
        "degree-counting"
    }

    #[instrument(level = "debug", skip(self))]
    fn decode(&self, labels: &[usize]) -> DomainResult<LabeledTree> {
        let n = validate_labels(labels)?;
        decode_by_degree(labels, n)
    }
}

/// Degree-counting loop over the vertex set `1..=n`.
///
/// Requires every label in `1..=n`. With `n == labels.len() + 2` it cannot
/// fail; any other `n` leaves the wrong number of leaves at the end.
fn decode_by_degree(labels: &[usize], n: usize) -> DomainResult<LabeledTree> {
    let mut degree = vec![1usize; n + 1];
    degree[0] = 0;
    for &a in labels {
        degree[a] += 1;
    }

    // exactly the vertices of degree 1, smallest on top
    let mut leaves: BinaryHeap<Reverse<usize>> = (1..=n)
        .filter(|&v| degree[v] == 1)
        .map(Reverse)
        .collect();

    let mut edges = Vec::with_capacity(n - 1);
    for (position, &a) in labels.iter().enumerate() {
        let Reverse(j) = leaves
            .pop()
            .ok_or(DomainError::EmptyCandidateSet { position })?;
        trace!("step {}: leaf {} -> {}", position, j, a);
        edges.push(Edge::new(j, a));
        degree[j] -= 1;
        degree[a] -= 1;
        if degree[a] == 1 {
            leaves.push(Reverse(a));
        }
    }

    match (leaves.pop(), leaves.pop()) {
        (Some(Reverse(u)), Some(Reverse(v))) if leaves.is_empty() => {
            edges.push(Edge::new(u, v));
        }
        _ => {
            return Err(DomainError::EmptyCandidateSet {
                position: labels.len(),
            })
        }
    }

    debug!("decoded {} labels into {} edges", labels.len(), edges.len());
    Ok(LabeledTree::from_edges(n, edges))
}

/// Reconstructs the tree by excluding used and still-pending vertices.
///
/// At step `i` the selected vertex is the smallest label that was not
/// selected before and does not occur in `labels[i..]`. A label becomes
/// eligible once the position passes its last occurrence, so last-occurrence
/// indices are computed once up front instead of rescanning the suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExclusionSetDecoder;

impl Decoder for ExclusionSetDecoder {
    fn name(&self) -> &'static str {
        "exclusion-set"
    }

    #[instrument(level = "debug", skip(self))]
    fn decode(&self, labels: &[usize]) -> DomainResult<LabeledTree> {
        let n = validate_labels(labels)?;
        decode_by_exclusion(labels, n)
    }
}

/// Exclusion-set loop over the vertex set `1..=n`; same contract as
/// [`decode_by_degree`].
fn decode_by_exclusion(labels: &[usize], n: usize) -> DomainResult<LabeledTree> {
    let m = labels.len();

    let mut last_occurrence: Vec<Option<usize>> = vec![None; n + 1];
    for (i, &t) in labels.iter().enumerate() {
        last_occurrence[t] = Some(i);
    }

    // released[i]: labels that become eligible after position i
    let mut released: Vec<Vec<usize>> = vec![Vec::new(); m];
    let mut candidates = BinaryHeap::new();
    for v in 1..=n {
        match last_occurrence[v] {
            Some(i) => released[i].push(v),
            None => candidates.push(Reverse(v)),
        }
    }

    let mut selected = vec![false; n + 1];
    let mut edges = Vec::with_capacity(n - 1);
    for (position, &t) in labels.iter().enumerate() {
        if position > 0 {
            candidates.extend(released[position - 1].iter().copied().map(Reverse));
        }
        let Reverse(s) = candidates
            .pop()
            .ok_or(DomainError::EmptyCandidateSet { position })?;
        trace!("step {}: selected {} -> {}", position, s, t);
        edges.push(Edge::new(s, t));
        selected[s] = true;
    }

    let remaining: Vec<usize> = (1..=n).filter(|&v| !selected[v]).collect();
    match remaining.as_slice() {
        &[u, v] => edges.push(Edge::new(u, v)),
        _ => return Err(DomainError::EmptyCandidateSet { position: m }),
    }

    debug!("decoded {} labels into {} edges", m, edges.len());
    Ok(LabeledTree::from_edges(n, edges))
}

/// Selects one of the decoding algorithms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DecoderKind {
    #[default]
    DegreeCounting,
    ExclusionSet,
}

impl DecoderKind {
    pub const ALL: [DecoderKind; 2] = [DecoderKind::DegreeCounting, DecoderKind::ExclusionSet];

    pub fn decoder(self) -> Box<dyn Decoder> {
        match self {
            DecoderKind::DegreeCounting => Box::new(DegreeCountingDecoder),
            DecoderKind::ExclusionSet => Box::new(ExclusionSetDecoder),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecoderKind::DegreeCounting => "degree-counting",
            DecoderKind::ExclusionSet => "exclusion-set",
        }
    }
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecoderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        DecoderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| DomainError::Malformed(format!("unknown algorithm '{}'", s)))
    }
}
