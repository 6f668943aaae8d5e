//! Prüfer sequence: the validated input of both decoders

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Checks that every label lies in `1..=n` with `n = labels.len() + 2`.
///
/// Returns `n`, the number of vertices of the encoded tree. The first
/// offending label is reported.
pub fn validate_labels(labels: &[usize]) -> DomainResult<usize> {
    let max = labels.len() + 2;
    if let Some((position, &label)) = labels
        .iter()
        .enumerate()
        .find(|&(_, &label)| label == 0 || label > max)
    {
        return Err(DomainError::LabelOutOfRange {
            position,
            label,
            max,
        });
    }
    Ok(max)
}

/// An ordered sequence of `n - 2` vertex labels encoding a labeled tree on `1..=n`.
///
/// Construction validates the label range, so every `PrueferSequence`
/// decodes to exactly one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PrueferSequence {
    labels: Vec<usize>,
}

impl PrueferSequence {
    #[instrument(level = "trace")]
    pub fn new(labels: Vec<usize>) -> DomainResult<Self> {
        validate_labels(&labels)?;
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of vertices of the encoded tree.
    pub fn vertex_count(&self) -> usize {
        self.labels.len() + 2
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}

impl AsRef<[usize]> for PrueferSequence {
    fn as_ref(&self) -> &[usize] {
        &self.labels
    }
}

impl TryFrom<Vec<usize>> for PrueferSequence {
    type Error = DomainError;

    fn try_from(labels: Vec<usize>) -> DomainResult<Self> {
        Self::new(labels)
    }
}

impl fmt::Display for PrueferSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.labels.iter().join(", "))
    }
}

/// Parses `2 3 5`, `2,3,5` or `[2, 3, 5]`.
impl FromStr for PrueferSequence {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        let body = match (trimmed.strip_prefix('['), trimmed.strip_suffix(']')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => {
                return Err(DomainError::Malformed(format!(
                    "unbalanced brackets in '{}'",
                    trimmed
                )))
            }
        };

        let labels = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<usize>().map_err(|_| {
                    DomainError::Malformed(format!("'{}' is not a vertex label", token))
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Self::new(labels)
    }
}
