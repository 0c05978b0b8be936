//! Countdown that finishes the attempt when it reaches zero

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    dom::{
        selector::{FINISH_BUTTON, REMAINING_ATTR, TIMER, TIMER_DISPLAY},
        ElementId, Page,
    },
    state::TimerState,
};

/// Shortest accepted tick period
const MIN_TICK: Duration = Duration::from_millis(1);

/// How ticks after the first one are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    /// Each step sleeps one period after the previous step ran; delays
    /// accumulate.
    #[default]
    Faithful,
    /// Remaining time is derived from the elapsed time since setup, so late
    /// or skipped wake-ups do not stretch the countdown.
    DriftCorrected,
}

/// Countdown scheduling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    pub tick: Duration,
    pub mode: TickMode,
}

impl CountdownConfig {
    pub fn new(tick: Duration, mode: TickMode) -> Self {
        Self {
            tick: tick.max(MIN_TICK),
            mode,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), TickMode::Faithful)
    }
}

/// Parse the page-supplied starting value.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// digits are read and anything after them is ignored. Absent, unparseable
/// and negative values count as zero.
pub fn parse_remaining(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 0;
    }
    // Saturate rather than reject absurdly long digit runs.
    digits[..end].parse().unwrap_or(u64::MAX)
}

/// Format seconds as `MM:SS`, each part zero-padded to two digits
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Handle to a running countdown
#[derive(Debug)]
pub struct CountdownHandle {
    state: watch::Receiver<TimerState>,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    /// Latest published state
    pub fn state(&self) -> TimerState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every later tick
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    /// Whether the tick loop has exited
    pub fn is_done(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait until the countdown has expired and return the final state
    pub async fn finished(&mut self) -> TimerState {
        let expired = self
            .state
            .wait_for(|s| s.finished)
            .await
            .map(|state| (*state).clone());
        // The sender is gone once the loop exits, so fall back to the last value.
        let state = expired.unwrap_or_else(|_| self.state.borrow().clone());
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        state
    }
}

struct Countdown<P: Page> {
    page: Arc<P>,
    display: ElementId,
    state_tx: watch::Sender<TimerState>,
}

impl<P: Page + 'static> Countdown<P> {
    /// Show `remaining`, and at zero fire the finish action. Returns true once
    /// the countdown is over.
    fn render(&self, remaining: u64) -> bool {
        let text = format_mmss(remaining);
        self.page.set_text(self.display, &text);

        if remaining > 0 {
            self.state_tx.send_replace(TimerState::active(remaining));
            return false;
        }

        let finish_clicked = match self.page.query_element(&FINISH_BUTTON) {
            Some(button) => {
                info!("Countdown expired, triggering finish action");
                self.page.click(button);
                true
            }
            None => {
                debug!("Countdown expired, no finish control on the page");
                false
            }
        };
        self.state_tx.send_replace(TimerState::finished(finish_clicked));
        true
    }

    async fn run_faithful(self, initial: u64, tick: Duration) {
        let mut remaining = initial;
        loop {
            remaining -= 1;
            sleep(tick).await;
            if self.render(remaining) {
                break;
            }
        }
    }

    async fn run_drift_corrected(self, initial: u64, tick: Duration, started: Instant) {
        let mut interval = interval_at(started + tick, tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let tick_nanos = tick.as_nanos().max(1);

        loop {
            interval.tick().await;
            let elapsed_ticks = started.elapsed().as_nanos() / tick_nanos;
            let remaining = initial.saturating_sub(u64::try_from(elapsed_ticks).unwrap_or(u64::MAX));
            if self.render(remaining) {
                break;
            }
        }
    }
}

/// Set up the countdown on `page`.
///
/// Returns `None` without side effects when the countdown container or its
/// display is missing. Otherwise the first tick renders immediately (and at
/// zero finishes immediately); later ticks run on the tokio runtime, so a
/// positive starting value requires one.
pub fn start_countdown<P: Page + 'static>(
    page: Arc<P>,
    config: CountdownConfig,
) -> Option<CountdownHandle> {
    let Some(timer) = page.query_element(&TIMER) else {
        debug!("No countdown container on page, skipping countdown");
        return None;
    };
    let Some(display) = page.query_within(timer, &TIMER_DISPLAY) else {
        debug!("Countdown container has no display, skipping countdown");
        return None;
    };

    let initial = parse_remaining(page.attribute(timer, REMAINING_ATTR).as_deref());
    let started = Instant::now();
    let (state_tx, state_rx) = watch::channel(TimerState::active(initial));
    let countdown = Countdown { page, display, state_tx };

    info!("Starting countdown at {} ({:?} mode)", format_mmss(initial), config.mode);
    if countdown.render(initial) {
        return Some(CountdownHandle {
            state: state_rx,
            task: None,
        });
    }

    let tick = config.tick.max(MIN_TICK);
    let task = match config.mode {
        TickMode::Faithful => tokio::spawn(countdown.run_faithful(initial, tick)),
        TickMode::DriftCorrected => {
            tokio::spawn(countdown.run_drift_corrected(initial, tick, started))
        }
    };

    Some(CountdownHandle {
        state: state_rx,
        task: Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_integer() {
        assert_eq!(parse_remaining(Some("65")), 65);
        assert_eq!(parse_remaining(Some("  42s")), 42);
        assert_eq!(parse_remaining(Some("+7")), 7);
        assert_eq!(parse_remaining(Some("007")), 7);
    }

    #[test]
    fn invalid_or_negative_values_are_zero() {
        assert_eq!(parse_remaining(None), 0);
        assert_eq!(parse_remaining(Some("")), 0);
        assert_eq!(parse_remaining(Some("abc")), 0);
        assert_eq!(parse_remaining(Some("-30")), 0);
        assert_eq!(parse_remaining(Some("-")), 0);
    }

    #[test]
    fn oversized_values_saturate() {
        assert_eq!(parse_remaining(Some("99999999999999999999999")), u64::MAX);
    }

    #[test]
    fn formats_two_digit_parts() {
        assert_eq!(format_mmss(65), "01:05");
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(600), "10:00");
        assert_eq!(format_mmss(6000), "100:00");
    }

    #[test]
    fn format_is_mm_ss_up_to_99_minutes() {
        for seconds in 0..=5999 {
            let text = format_mmss(seconds);
            let (minutes, secs) = text.split_once(':').unwrap();
            assert_eq!(minutes.len(), 2, "{}", text);
            assert_eq!(secs.len(), 2, "{}", text);
            assert_eq!(minutes.parse::<u64>().unwrap() * 60 + secs.parse::<u64>().unwrap(), seconds);
        }
    }

    #[test]
    fn tick_is_clamped() {
        let config = CountdownConfig::new(Duration::ZERO, TickMode::DriftCorrected);
        assert_eq!(config.tick, MIN_TICK);
    }
}
