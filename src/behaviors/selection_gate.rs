//! Confirmation control gated on an answer being selected

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    dom::{
        selector::{ANSWER_FORM, CONFIRM_BUTTON, WATCHED_INPUTS},
        ElementId, Page,
    },
    state::GateState,
};

/// Whether any of `inputs` is currently checked
pub fn any_checked<P: Page + ?Sized>(page: &P, inputs: &[ElementId]) -> bool {
    inputs.iter().any(|&input| page.is_checked(input))
}

/// Handle to an installed selection gate
#[derive(Debug, Clone)]
pub struct GateHandle {
    state: watch::Receiver<GateState>,
    inputs: Arc<[ElementId]>,
}

impl GateHandle {
    pub fn state(&self) -> GateState {
        *self.state.borrow()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Watched inputs, in document order
    pub fn inputs(&self) -> &[ElementId] {
        &self.inputs
    }

    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.clone()
    }
}

struct Gate {
    confirm: ElementId,
    inputs: Arc<[ElementId]>,
    state_tx: watch::Sender<GateState>,
}

impl Gate {
    /// Recompute from the current checked states and apply the result
    fn evaluate<P: Page + ?Sized>(&self, page: &P) {
        let enabled = any_checked(page, &self.inputs);
        page.set_disabled(self.confirm, !enabled);
        self.state_tx.send_modify(|state| {
            if state.enabled != enabled {
                debug!("Confirmation control {}", if enabled { "enabled" } else { "disabled" });
            }
            state.enabled = enabled;
            state.evaluations += 1;
        });
    }
}

/// Install the selection gate on `page`.
///
/// Returns `None` without side effects when the confirmation control or the
/// answer form is missing. Otherwise one change handler is registered per
/// watched input and the gate is evaluated once, which picks up controls that
/// were already checked when the page loaded.
pub fn install_selection_gate<P: Page + 'static>(page: Arc<P>) -> Option<GateHandle> {
    let Some(confirm) = page.query_element(&CONFIRM_BUTTON) else {
        debug!("No confirmation control on page, skipping selection gate");
        return None;
    };
    let Some(form) = page.query_element(&ANSWER_FORM) else {
        debug!("No answer form on page, skipping selection gate");
        return None;
    };

    let inputs: Arc<[ElementId]> = page.query_all_within(form, &WATCHED_INPUTS).into();
    let (state_tx, state_rx) = watch::channel(GateState::new(inputs.len()));
    let gate = Arc::new(Gate {
        confirm,
        inputs: Arc::clone(&inputs),
        state_tx,
    });

    // Handlers hold the page weakly; the page owns them.
    let weak_page: Weak<P> = Arc::downgrade(&page);
    for &input in inputs.iter() {
        let gate = Arc::clone(&gate);
        let weak_page = weak_page.clone();
        page.on_change(
            input,
            Arc::new(move || {
                if let Some(page) = weak_page.upgrade() {
                    gate.evaluate(page.as_ref());
                }
            }),
        );
    }

    gate.evaluate(page.as_ref());
    info!("Selection gate watching {} inputs", inputs.len());

    Some(GateHandle {
        state: state_rx,
        inputs,
    })
}
