//! Prüfer sequence decoding.
//!
//! A Prüfer sequence of `n - 2` labels encodes exactly one labeled tree on
//! the vertices `1..=n`. This crate decodes such sequences with two
//! independent algorithms that must agree on every input:
//!
//! - [`DegreeCountingDecoder`](domain::DegreeCountingDecoder): joins the
//!   smallest current leaf by running vertex degrees.
//! - [`ExclusionSetDecoder`](domain::ExclusionSetDecoder): joins the
//!   smallest vertex neither used yet nor still pending in the sequence.
//!
//! [`encode`](domain::encode) is the inverse, and
//! [`DecodeService`](application::services::DecodeService) adds
//! cross-checking and parallel batch decoding on top.
//!
//! ```
//! use pruefer::domain::{Decoder, DegreeCountingDecoder, LabeledTree};
//!
//! let tree = DegreeCountingDecoder.decode(&[4, 4, 4]).unwrap();
//! assert_eq!(tree, LabeledTree::from_edges(5, [(1, 4), (2, 4), (3, 4), (4, 5)]));
//! assert!(tree.is_spanning_tree());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    encode, Decoder, DecoderKind, DegreeCountingDecoder, DomainError, Edge, ExclusionSetDecoder,
    LabeledTree, PrueferSequence,
};
