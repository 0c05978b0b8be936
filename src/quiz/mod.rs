//! Quiz question page model
//!
//! Everything the server side decides before the page behaviors run: which
//! controls a question renders, the countdown's starting value, and how a
//! submitted selection is read back.

pub mod question_page;
pub mod timing;

use serde::{Deserialize, Serialize};

use crate::dom::InputKind;

// Re-export main types
pub use question_page::{AttrValue, QuestionPage};
pub use timing::remaining_seconds;

/// Options offered by every question
pub const OPTION_COUNT: u8 = 4;

/// Default attempt length in minutes
pub const DEFAULT_DURATION_MINUTES: u64 = 120;

/// How many options a question accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
}

impl QuestionKind {
    /// Control rendered for each option
    pub fn input_kind(&self) -> InputKind {
        match self {
            QuestionKind::SingleChoice => InputKind::Radio,
            QuestionKind::MultipleChoice => InputKind::Checkbox,
        }
    }
}

/// Read submitted option values the way the confirm endpoint does: values
/// that are not valid option indices are dropped, duplicates collapse, and
/// the result is sorted.
pub fn sanitize_selection<S: AsRef<str>>(values: &[S]) -> Vec<u8> {
    let mut selected: Vec<u8> = values
        .iter()
        .filter_map(|v| v.as_ref().trim().parse::<u8>().ok())
        .filter(|v| *v < OPTION_COUNT)
        .collect();
    selected.sort_unstable();
    selected.dedup();
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_sorted_and_deduplicated() {
        assert_eq!(sanitize_selection(&["3", "1", "3", "0"]), vec![0, 1, 3]);
    }

    #[test]
    fn out_of_range_and_garbage_values_are_dropped() {
        assert_eq!(sanitize_selection(&["4", "-1", "x", "2"]), vec![2]);
        assert!(sanitize_selection::<&str>(&[]).is_empty());
    }

    #[test]
    fn kinds_map_to_native_controls() {
        assert_eq!(QuestionKind::SingleChoice.input_kind(), InputKind::Radio);
        assert_eq!(QuestionKind::MultipleChoice.input_kind(), InputKind::Checkbox);
    }
}
