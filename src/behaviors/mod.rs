//! Page behaviors
//!
//! Both behaviors are set up once per page load by `init_page` and live as
//! long as the page. They share nothing.

pub mod countdown;
pub mod selection_gate;

use std::sync::Arc;

use tracing::debug;

use crate::dom::Page;

// Re-export main types
pub use countdown::{format_mmss, parse_remaining, start_countdown, CountdownConfig, CountdownHandle, TickMode};
pub use selection_gate::{any_checked, install_selection_gate, GateHandle};

/// Handles of the behaviors that found their elements on the page
#[derive(Debug)]
pub struct PageBehaviors {
    pub countdown: Option<CountdownHandle>,
    pub gate: Option<GateHandle>,
}

/// Page-ready entry point: set up the countdown and the selection gate.
///
/// Must be called from within a tokio runtime when the page carries a
/// positive countdown.
pub fn init_page<P: Page + 'static>(page: Arc<P>, config: CountdownConfig) -> PageBehaviors {
    let countdown = start_countdown(Arc::clone(&page), config);
    let gate = install_selection_gate(page);
    debug!(
        "Page behaviors initialized: countdown={}, gate={}",
        countdown.is_some(),
        gate.is_some()
    );
    PageBehaviors { countdown, gate }
}
