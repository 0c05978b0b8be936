//! Element selectors used by the page behaviors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a selectable form control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Radio,
    Checkbox,
}

impl InputKind {
    /// Value of the `type` attribute for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Radio => "radio",
            InputKind::Checkbox => "checkbox",
        }
    }

    pub fn from_type_attr(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("radio") {
            Some(InputKind::Radio)
        } else if value.eq_ignore_ascii_case("checkbox") {
            Some(InputKind::Checkbox)
        } else {
            None
        }
    }
}

/// The small selector vocabulary the behaviors need.
///
/// Each variant renders to the equivalent CSS selector through `Display`, so a
/// browser-backed `Page` can hand it straight to `querySelector`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(&'static str),
    /// `.class`
    Class(&'static str),
    /// `button[formaction$="suffix"]`
    FormActionSuffix(&'static str),
    /// `input[type="radio"], input[type="checkbox"]`, in the given order
    Inputs(&'static [InputKind]),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
            Selector::FormActionSuffix(suffix) => write!(f, "button[formaction$=\"{}\"]", suffix),
            Selector::Inputs(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "input[type=\"{}\"]", kind.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// Countdown container; carries the initial value in `data-remaining`
pub const TIMER: Selector = Selector::Class("timer");
/// `MM:SS` text target inside the countdown container
pub const TIMER_DISPLAY: Selector = Selector::Class("mmss");
/// Attribute holding the initial remaining seconds
pub const REMAINING_ATTR: &str = "data-remaining";
/// Control that ends the attempt
pub const FINISH_BUTTON: Selector = Selector::FormActionSuffix("/finish");
/// Form holding the answer options
pub const ANSWER_FORM: Selector = Selector::Id("answerForm");
/// Control gated on a selection
pub const CONFIRM_BUTTON: Selector = Selector::Id("confirmBtn");
/// Answer options watched by the selection gate
pub const WATCHED_INPUTS: Selector = Selector::Inputs(&[InputKind::Radio, InputKind::Checkbox]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_css_selectors() {
        assert_eq!(TIMER.to_string(), ".timer");
        assert_eq!(CONFIRM_BUTTON.to_string(), "#confirmBtn");
        assert_eq!(FINISH_BUTTON.to_string(), "button[formaction$=\"/finish\"]");
        assert_eq!(
            WATCHED_INPUTS.to_string(),
            "input[type=\"radio\"], input[type=\"checkbox\"]"
        );
    }

    #[test]
    fn type_attr_is_case_insensitive() {
        assert_eq!(InputKind::from_type_attr("CheckBox"), Some(InputKind::Checkbox));
        assert_eq!(InputKind::from_type_attr("text"), None);
    }
}
