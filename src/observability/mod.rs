//! Observability utilities.
//!
//! The library reports probe outcomes, adapter binding and file persistence
//! failures through `tracing`. This module installs a subscriber for
//! binaries and tests that want to see those events.
//!
//! # Example
//!
//! ```no_run
//! wsk::observability::init_logging(true).unwrap();
//! ```

pub mod logger;

// Re-export main functions for convenience
pub use logger::{default_filter, init_json_logging, init_logging};
