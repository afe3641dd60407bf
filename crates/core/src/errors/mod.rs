//! Error types for preheat operations

mod display;
mod recovery;
mod types;

pub use types::{Error, Result};
