//! Countdown starting value for a question page

use chrono::{DateTime, Utc};

/// Seconds left in an attempt of `duration_minutes` that started at
/// `started_at` (unix seconds), as of `now`.
///
/// A missing start time means the attempt starts now. The result never goes
/// below zero, and a start time in the future does not extend the attempt past
/// its full duration.
pub fn remaining_seconds(duration_minutes: u64, started_at: Option<i64>, now: DateTime<Utc>) -> u64 {
    let total = duration_minutes.saturating_mul(60);
    let now_secs = now.timestamp();
    let elapsed = now_secs.saturating_sub(started_at.unwrap_or(now_secs));
    if elapsed <= 0 {
        return total;
    }
    total.saturating_sub(elapsed as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_attempt_has_full_duration() {
        assert_eq!(remaining_seconds(120, None, at(1_700_000_000)), 7200);
        assert_eq!(remaining_seconds(120, Some(1_700_000_000), at(1_700_000_000)), 7200);
    }

    #[test]
    fn elapsed_time_is_subtracted() {
        assert_eq!(remaining_seconds(2, Some(1_000), at(1_055)), 65);
    }

    #[test]
    fn expired_attempt_is_zero() {
        assert_eq!(remaining_seconds(1, Some(1_000), at(5_000)), 0);
    }

    #[test]
    fn future_start_is_capped_at_duration() {
        assert_eq!(remaining_seconds(1, Some(2_000), at(1_000)), 60);
    }
}
