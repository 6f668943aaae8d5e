//! Labeled tree: the result type of decoding

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::union_find::DisjointSet;

/// Undirected edge between two vertex labels.
///
/// Stored normalized (smaller label first), so `Edge::new(3, 1) == Edge::new(1, 3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(usize, usize);

impl Edge {
    pub fn new(u: usize, v: usize) -> Self {
        if u <= v {
            Self(u, v)
        } else {
            Self(v, u)
        }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }

    pub fn contains(&self, v: usize) -> bool {
        self.0 == v || self.1 == v
    }

    /// The endpoint opposite to `v`, if `v` is an endpoint.
    pub fn other(&self, v: usize) -> Option<usize> {
        if self.0 == v {
            Some(self.1)
        } else if self.1 == v {
            Some(self.0)
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Edge {
    fn from((u, v): (usize, usize)) -> Self {
        Edge::new(u, v)
    }
}

/// Parses `1-2`, `1,2`, `1 2` or `(1, 2)`: two labels and exactly one separator.
impl FromStr for Edge {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let malformed = || {
            DomainError::Malformed(format!("'{}' is not an edge, expected u-v", trimmed))
        };

        let (u, v) = if let Some(pair) = body.split_once(',') {
            pair
        } else if let Some(pair) = body.split_once('-') {
            pair
        } else {
            let mut parts = body.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(u), Some(v), None) => (u, v),
                _ => return Err(malformed()),
            }
        };

        let parse = |token: &str| {
            let token = token.trim();
            if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            token.parse::<usize>().map_err(|_| malformed())
        };
        Ok(Edge::new(parse(u)?, parse(v)?))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Unordered set of edges over the vertex labels `1..=vertex_count`.
///
/// Decoders always produce a spanning tree; trees built by hand through
/// [`LabeledTree::from_edges`] are not checked, use [`LabeledTree::is_spanning_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledTree {
    vertex_count: usize,
    edges: BTreeSet<Edge>,
}

impl LabeledTree {
    pub fn from_edges<I, E>(vertex_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        Self {
            vertex_count,
            edges: edges.into_iter().map(Into::into).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &BTreeSet<Edge> {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        self.edges.contains(&Edge::new(u, v))
    }

    pub fn degree(&self, v: usize) -> usize {
        self.edges.iter().filter(|e| e.contains(v)).count()
    }

    /// Neighbors of `v` in ascending label order.
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self.edges.iter().filter_map(|e| e.other(v)).collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Adjacency lists indexed by label; slot 0 stays empty.
    ///
    /// Edges with an endpoint outside `1..=vertex_count` are left out.
    pub(crate) fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertex_count + 1];
        for edge in self.edges.iter().filter(|e| self.edge_in_range(e)) {
            adjacency[edge.low()].push(edge.high());
            adjacency[edge.high()].push(edge.low());
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }
        adjacency
    }

    /// Vertices of degree 1 in ascending order.
    pub fn leaves(&self) -> Vec<usize> {
        let adjacency = self.adjacency();
        (1..=self.vertex_count)
            .filter(|&v| adjacency[v].len() == 1)
            .collect()
    }

    fn edge_in_range(&self, edge: &Edge) -> bool {
        edge.low() >= 1 && edge.high() <= self.vertex_count
    }

    fn labels_in_range(&self) -> bool {
        self.edges.iter().all(|e| self.edge_in_range(e))
    }

    /// True if no edge closes a cycle (self-loops count as cycles).
    ///
    /// An edge outside `1..=vertex_count` makes the check fail.
    pub fn is_acyclic(&self) -> bool {
        if !self.labels_in_range() {
            return false;
        }
        let mut set = DisjointSet::new(self.vertex_count + 1);
        self.edges.iter().all(|e| set.union(e.low(), e.high()))
    }

    /// True if every vertex in `1..=vertex_count` is reachable from vertex 1.
    pub fn is_connected(&self) -> bool {
        if self.vertex_count == 0 || !self.labels_in_range() {
            return false;
        }
        let mut set = DisjointSet::new(self.vertex_count + 1);
        for e in &self.edges {
            set.union(e.low(), e.high());
        }
        let root = set.find(1);
        (2..=self.vertex_count).all(|v| set.find(v) == root)
    }

    /// Connected, acyclic and exactly `vertex_count - 1` edges over `1..=vertex_count`.
    pub fn is_spanning_tree(&self) -> bool {
        self.vertex_count >= 1
            && self.edges.len() == self.vertex_count - 1
            && self.labels_in_range()
            && self.is_acyclic()
            && self.is_connected()
    }
}

impl fmt::Display for LabeledTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.edges.iter().join(", "))
    }
}
