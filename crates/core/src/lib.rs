//! Core domain types, errors, and constants for the `preheat` engine.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias
//!   shared by every crate in the workspace.
//! - **`types`**: Strategy definitions, execution results, history records and
//!   the bounded system load score.
//! - **`constants`**: Default key prefixes, thresholds and environment
//!   variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
