//! Countdown state published to observers

use serde::{Deserialize, Serialize};

use crate::behaviors::countdown::format_mmss;

/// Snapshot of the countdown after its latest tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub active: bool,
    /// Value currently shown on the display
    pub remaining_seconds: u64,
    /// Text currently shown on the display
    pub display: String,
    pub finished: bool,
    /// Whether a finish control was found and clicked on expiry
    pub finish_clicked: bool,
}

impl TimerState {
    /// Create an active timer state showing `remaining_seconds`
    pub fn active(remaining_seconds: u64) -> Self {
        Self {
            active: true,
            remaining_seconds,
            display: format_mmss(remaining_seconds),
            finished: false,
            finish_clicked: false,
        }
    }

    /// Create the terminal state reached at zero
    pub fn finished(finish_clicked: bool) -> Self {
        Self {
            active: false,
            remaining_seconds: 0,
            display: format_mmss(0),
            finished: true,
            finish_clicked,
        }
    }

    /// Check if the countdown is still ticking
    pub fn is_active(&self) -> bool {
        self.active
    }
}
