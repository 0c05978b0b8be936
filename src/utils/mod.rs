//! Utility functions module
//!
//! Process-level helpers for the harness binary.

pub mod signals;

pub use signals::shutdown_signal;
