//! Countdown monitor background task

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that follows the countdown and reports the expiry and the
/// resulting submission. Returns once the countdown has finished.
pub async fn countdown_monitor_task(state: Arc<AppState>) {
    let Some(mut timer_rx) = state.timer_rx.clone() else {
        info!("Page has no countdown, monitor not started");
        return;
    };
    info!("Starting countdown monitor task");

    loop {
        let current = timer_rx.borrow_and_update().clone();
        debug!("Countdown at {}", current.display);

        if current.finished {
            if current.finish_clicked {
                match state.submissions().last() {
                    Some(submission) => info!(
                        "Attempt finished by countdown: {} with selection {:?}",
                        submission.action, submission.selected
                    ),
                    None => warn!("Finish control clicked but no submission was recorded"),
                }
            } else {
                warn!("Countdown expired but the page has no finish control");
            }
            break;
        }

        if timer_rx.changed().await.is_err() {
            // Sender gone without a finished state; nothing more will arrive.
            let last = timer_rx.borrow().clone();
            if !last.finished {
                warn!("Countdown stopped at {} without finishing", last.display);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::{
        behaviors::init_page,
        quiz::{QuestionKind, QuestionPage},
    };

    #[tokio::test(start_paused = true)]
    async fn returns_after_expiry() {
        let page = Arc::new(QuestionPage::new(QuestionKind::SingleChoice).remaining_seconds(3).build());
        let behaviors = init_page(Arc::clone(&page), Default::default());
        let state = Arc::new(AppState::new(page, &behaviors, "127.0.0.1".into(), 0));

        let monitor = tokio::spawn(countdown_monitor_task(Arc::clone(&state)));
        tokio::time::timeout(Duration::from_secs(10), monitor)
            .await
            .expect("monitor should return once the countdown finishes")
            .unwrap();
        assert_eq!(state.submissions().len(), 1);
    }

    #[tokio::test]
    async fn returns_immediately_without_countdown() {
        let page = Arc::new(QuestionPage::new(QuestionKind::SingleChoice).without_timer().build());
        let behaviors = init_page(Arc::clone(&page), Default::default());
        let state = Arc::new(AppState::new(page, &behaviors, "127.0.0.1".into(), 0));
        countdown_monitor_task(state).await;
    }
}
