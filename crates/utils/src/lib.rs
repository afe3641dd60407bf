//! Shared utilities for the preheat workspace
//!
//! Currently this is the tracing setup used by the CLI plus the structured
//! events the engine emits around every preheating run.

pub mod tracing;
