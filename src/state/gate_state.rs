//! Selection gate state

use serde::{Deserialize, Serialize};

/// Outcome of the latest gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    /// Whether the confirmation control is enabled
    pub enabled: bool,
    /// Number of watched inputs
    pub watched: usize,
    /// Number of evaluations so far, the setup evaluation included
    pub evaluations: u64,
}

impl GateState {
    pub fn new(watched: usize) -> Self {
        Self {
            enabled: false,
            watched,
            evaluations: 0,
        }
    }
}
