//! Application services

mod decode;

pub use decode::{parse_batch, BatchEntry, CrossCheck, DecodeService};
