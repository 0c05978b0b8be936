//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{
    behaviors::{CountdownConfig, TickMode},
    quiz::{remaining_seconds, QuestionKind, QuestionPage, DEFAULT_DURATION_MINUTES},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "quiz-page")]
#[command(about = "Runs the quiz page behaviors on an in-memory page and serves its state")]
#[command(version)]
pub struct Config {
    /// Port to bind the harness server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON page fixture; when given, the question flags below are ignored
    #[arg(short, long)]
    pub fixture: Option<PathBuf>,

    /// Countdown starting value in seconds; derived from the attempt
    /// duration and start time when omitted
    #[arg(short, long)]
    pub remaining: Option<u64>,

    /// Attempt duration in minutes
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    pub duration_minutes: u64,

    /// Attempt start as unix seconds; defaults to now
    #[arg(long)]
    pub started_at: Option<i64>,

    /// Kind of question to render
    #[arg(long, value_enum, default_value = "single-choice")]
    pub question_kind: QuestionKind,

    /// Countdown tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Derive the remaining time from elapsed time instead of counting ticks
    #[arg(long)]
    pub drift_corrected: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn countdown_config(&self) -> CountdownConfig {
        let mode = if self.drift_corrected {
            TickMode::DriftCorrected
        } else {
            TickMode::Faithful
        };
        CountdownConfig::new(Duration::from_millis(self.tick_ms), mode)
    }

    /// Countdown starting value as of `now`
    pub fn initial_remaining(&self, now: DateTime<Utc>) -> u64 {
        self.remaining
            .unwrap_or_else(|| remaining_seconds(self.duration_minutes, self.started_at, now))
    }

    /// Page to run: the fixture if one was given, otherwise a question page
    /// built from the flags
    pub fn question_page(&self, now: DateTime<Utc>) -> anyhow::Result<QuestionPage> {
        match &self.fixture {
            Some(path) => QuestionPage::from_fixture(path),
            None => Ok(QuestionPage::new(self.question_kind)
                .remaining_seconds(self.initial_remaining(now))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("quiz-page").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.countdown_config(), CountdownConfig::default());
        assert_eq!(config.question_kind, QuestionKind::SingleChoice);
    }

    #[test]
    fn explicit_remaining_wins() {
        let config = parse(&["--remaining", "65", "--started-at", "0"]);
        assert_eq!(config.initial_remaining(Utc::now()), 65);
    }

    #[test]
    fn remaining_derived_from_attempt_start() {
        let config = parse(&["--duration-minutes", "2", "--started-at", "1000"]);
        let now = Utc.timestamp_opt(1_055, 0).unwrap();
        assert_eq!(config.initial_remaining(now), 65);
    }

    #[test]
    fn drift_corrected_flag_selects_mode() {
        let config = parse(&["--drift-corrected", "--tick-ms", "250", "-v"]);
        assert_eq!(
            config.countdown_config(),
            CountdownConfig::new(Duration::from_millis(250), TickMode::DriftCorrected)
        );
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn question_kind_flag() {
        let config = parse(&["--question-kind", "multiple-choice"]);
        let page = config.question_page(Utc::now()).unwrap();
        assert_eq!(page.kind, QuestionKind::MultipleChoice);
    }
}
