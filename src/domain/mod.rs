//! Domain layer: sequences, trees and the decoding algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod sequence;
pub mod tree;
mod union_find;

pub use arena::{TreeArena, TreeNode};
pub use decoder::{Decoder, DecoderKind, DegreeCountingDecoder, ExclusionSetDecoder};
pub use encoder::encode;
pub use error::{DomainError, DomainResult};
pub use sequence::{validate_labels, PrueferSequence};
pub use tree::{Edge, LabeledTree};
