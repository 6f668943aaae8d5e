//! Decoding service
//!
//! Wraps the selected decoder, cross-checks the two algorithms against each
//! other and decodes batches of sequences in parallel.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    encode, Decoder, DecoderKind, DegreeCountingDecoder, ExclusionSetDecoder, LabeledTree,
    PrueferSequence,
};

/// Outcome of running both decoders on one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossCheck {
    pub sequence: PrueferSequence,
    pub degree_counting: LabeledTree,
    pub exclusion_set: LabeledTree,
}

impl CrossCheck {
    /// Both decoders produced the identical edge set.
    pub fn agree(&self) -> bool {
        self.degree_counting == self.exclusion_set
    }

    /// Both results are spanning trees on `1..=n`.
    pub fn valid(&self) -> bool {
        self.degree_counting.is_spanning_tree() && self.exclusion_set.is_spanning_tree()
    }

    /// Encoding the decoded tree gives back the input sequence.
    pub fn round_trips(&self) -> bool {
        encode(&self.degree_counting)
            .map(|s| s == self.sequence)
            .unwrap_or(false)
    }

    pub fn passed(&self) -> bool {
        self.agree() && self.valid() && self.round_trips()
    }
}

/// One line of a batch: its 1-based line number and parsed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub line: usize,
    pub sequence: PrueferSequence,
}

/// Parses one sequence per non-blank line; lines starting with `#` are skipped.
pub fn parse_batch(text: &str) -> ApplicationResult<Vec<BatchEntry>> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            content
                .parse::<PrueferSequence>()
                .map(|sequence| BatchEntry { line, sequence })
                .map_err(|source| ApplicationError::Line { line, source })
        })
        .collect()
}

/// Service for decoding Prüfer sequences with a configured algorithm.
pub struct DecodeService {
    kind: DecoderKind,
    decoder: Box<dyn Decoder>,
}

impl Default for DecodeService {
    fn default() -> Self {
        Self::new(DecoderKind::default())
    }
}

impl DecodeService {
    pub fn new(kind: DecoderKind) -> Self {
        Self {
            kind,
            decoder: kind.decoder(),
        }
    }

    pub fn kind(&self) -> DecoderKind {
        self.kind
    }

    #[instrument(level = "debug", skip(self), fields(algorithm = %self.kind))]
    pub fn decode(&self, sequence: &PrueferSequence) -> ApplicationResult<LabeledTree> {
        let tree = self.decoder.decode(sequence.labels())?;
        debug!("decode: {} -> {} edges", sequence, tree.edge_count());
        Ok(tree)
    }

    /// Decodes unvalidated labels, reporting range errors as domain errors.
    pub fn decode_labels(&self, labels: &[usize]) -> ApplicationResult<LabeledTree> {
        Ok(self.decoder.decode(labels)?)
    }

    /// Decodes with both algorithms and compares the results.
    ///
    /// Disagreement is reported through [`CrossCheck::agree`], not as an error.
    #[instrument(level = "debug", skip(self))]
    pub fn cross_check(&self, sequence: &PrueferSequence) -> ApplicationResult<CrossCheck> {
        let check = CrossCheck {
            sequence: sequence.clone(),
            degree_counting: DegreeCountingDecoder.decode(sequence.labels())?,
            exclusion_set: ExclusionSetDecoder.decode(sequence.labels())?,
        };
        if !check.agree() {
            warn!(
                "cross_check: decoders disagree on {}: {} vs {}",
                sequence, check.degree_counting, check.exclusion_set
            );
        }
        Ok(check)
    }

    /// Decodes every sequence independently on the rayon pool.
    ///
    /// Results keep the input order; each equals the sequential result.
    #[instrument(level = "debug", skip(self, sequences), fields(count = sequences.len()))]
    pub fn decode_batch(&self, sequences: &[PrueferSequence]) -> Vec<ApplicationResult<LabeledTree>> {
        let results: Vec<_> = sequences.par_iter().map(|s| self.decode(s)).collect();
        info!(
            "decode_batch: {} sequences, {} failed",
            results.len(),
            results.iter().filter(|r| r.is_err()).count()
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_skips_comments_and_blanks() {
        let entries = parse_batch("# header\n\n[1, 1]\n  4 4 4  \n[]\n").unwrap();
        let lines: Vec<usize> = entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(entries[2].sequence.is_empty());
    }

    #[test]
    fn test_parse_batch_reports_line() {
        let err = parse_batch("[1]\n[9]\n").unwrap_err();
        assert!(matches!(err, ApplicationError::Line { line: 2, .. }));
        assert!(err.domain().unwrap().is_invalid_sequence());
    }

    #[test]
    fn test_cross_check_passes() {
        let service = DecodeService::default();
        let seq = PrueferSequence::new(vec![3, 3, 1]).unwrap();
        let check = service.cross_check(&seq).unwrap();
        assert!(check.passed());
    }
}
