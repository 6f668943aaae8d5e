//! Application layer: services orchestrating the decoders

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
