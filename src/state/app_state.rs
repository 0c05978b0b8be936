//! Harness application state

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use super::{GateState, TimerState};
use crate::{
    behaviors::PageBehaviors,
    dom::{
        selector::{ANSWER_FORM, WATCHED_INPUTS},
        ElementId, MemoryPage, Page,
    },
    quiz::sanitize_selection,
};

/// Checked state of one answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputStatus {
    pub index: usize,
    pub value: Option<String>,
    pub checked: bool,
}

/// A form submission with its selection read back as option indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub action: String,
    pub selected: Vec<u8>,
}

/// State shared by the harness endpoints: the page plus observers of the
/// behaviors running on it
#[derive(Debug)]
pub struct AppState {
    pub page: Arc<MemoryPage>,
    /// Answer options in document order
    pub inputs: Vec<ElementId>,
    pub timer_rx: Option<watch::Receiver<TimerState>>,
    pub gate_rx: Option<watch::Receiver<GateState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last simulated user action
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(page: Arc<MemoryPage>, behaviors: &PageBehaviors, host: String, port: u16) -> Self {
        let inputs = match &behaviors.gate {
            Some(gate) => gate.inputs().to_vec(),
            None => page
                .query_element(&ANSWER_FORM)
                .map(|form| page.query_all_within(form, &WATCHED_INPUTS))
                .unwrap_or_default(),
        };

        Self {
            page,
            inputs,
            timer_rx: behaviors.countdown.as_ref().map(|c| c.subscribe()),
            gate_rx: behaviors.gate.as_ref().map(|g| g.subscribe()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Current countdown state, if the page has a countdown
    pub fn get_timer_state(&self) -> Option<TimerState> {
        self.timer_rx.as_ref().map(|rx| rx.borrow().clone())
    }

    /// Current gate state, if the page has a selection gate
    pub fn get_gate_state(&self) -> Option<GateState> {
        self.gate_rx.as_ref().map(|rx| *rx.borrow())
    }

    /// Check or uncheck the option at `index` as a user would
    pub fn set_input(&self, index: usize, checked: bool) -> Result<(), String> {
        let element = *self
            .inputs
            .get(index)
            .ok_or_else(|| format!("No answer option at index {}", index))?;

        info!("Setting option {} checked={}", index, checked);
        self.page.set_checked(element, checked)?;

        let action = format!("{} option {}", if checked { "check" } else { "uncheck" }, index);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(())
    }

    pub fn input_states(&self) -> Vec<InputStatus> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(index, &element)| InputStatus {
                index,
                value: self.page.attribute(element, "value"),
                checked: self.page.is_checked(element),
            })
            .collect()
    }

    pub fn submissions(&self) -> Vec<SubmissionView> {
        self.page
            .submissions()
            .into_iter()
            .map(|s| SubmissionView {
                selected: sanitize_selection(s.values.as_slice()),
                action: s.action,
            })
            .collect()
    }

    /// Calculate harness uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        behaviors::init_page,
        quiz::{QuestionKind, QuestionPage},
    };

    #[tokio::test]
    async fn tracks_inputs_and_submissions() {
        let page = Arc::new(QuestionPage::new(QuestionKind::MultipleChoice).build());
        let behaviors = init_page(Arc::clone(&page), Default::default());
        let state = AppState::new(Arc::clone(&page), &behaviors, "127.0.0.1".into(), 0);

        assert_eq!(state.inputs.len(), 4);
        assert_eq!(state.get_timer_state().map(|t| t.finished), Some(true));

        state.set_input(3, true).unwrap();
        state.set_input(1, true).unwrap();
        assert_eq!(state.get_gate_state().map(|g| g.enabled), Some(true));
        assert_eq!(state.get_last_action().0.as_deref(), Some("check option 1"));
        assert!(state.set_input(9, true).is_err());

        // The countdown had no starting value, so it finished at setup with
        // nothing checked yet.
        assert_eq!(
            state.submissions(),
            vec![SubmissionView { action: "/quiz/1/finish".into(), selected: vec![] }]
        );
        let checked: Vec<usize> = state
            .input_states()
            .into_iter()
            .filter(|i| i.checked)
            .map(|i| i.index)
            .collect();
        assert_eq!(checked, vec![1, 3]);
    }
}
