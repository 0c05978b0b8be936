//! State management module
//!
//! Observable state of the page behaviors and the harness state built on it.

pub mod app_state;
pub mod gate_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, InputStatus, SubmissionView};
pub use gate_state::GateState;
pub use timer_state::TimerState;
