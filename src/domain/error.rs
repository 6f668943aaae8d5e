//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent sequences or trees that violate Prüfer invariants.
///
/// `LabelOutOfRange`, `EmptyCandidateSet` and `Malformed` together form the
/// invalid-sequence family: input that cannot be decoded into any tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid sequence: label {label} at position {position} is outside 1..={max}")]
    LabelOutOfRange {
        position: usize,
        label: usize,
        max: usize,
    },

    #[error("invalid sequence: no candidate vertex left at position {position}")]
    EmptyCandidateSet { position: usize },

    #[error("invalid sequence: {0}")]
    Malformed(String),

    #[error("not a spanning tree on 1..={vertex_count}: {reason}")]
    NotATree { vertex_count: usize, reason: String },

    #[error("invalid root {root}: tree has vertices 1..={vertex_count}")]
    InvalidRoot { root: usize, vertex_count: usize },
}

impl DomainError {
    /// True for errors caused by a sequence that encodes no tree.
    pub fn is_invalid_sequence(&self) -> bool {
        matches!(
            self,
            DomainError::LabelOutOfRange { .. }
                | DomainError::EmptyCandidateSet { .. }
                | DomainError::Malformed(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
