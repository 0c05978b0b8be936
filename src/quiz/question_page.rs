//! Question page layout and JSON fixtures

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::{QuestionKind, OPTION_COUNT};
use crate::dom::{
    selector::REMAINING_ATTR,
    Element, MemoryPage,
};

/// Raw `data-remaining` value as written in a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(i64),
    Text(String),
}

impl AttrValue {
    fn render(&self) -> String {
        match self {
            AttrValue::Number(n) => n.to_string(),
            AttrValue::Text(s) => s.clone(),
        }
    }
}

/// Description of a question page, buildable into a `MemoryPage`.
///
/// Deserializes from JSON fixtures; every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionPage {
    pub attempt_id: u64,
    /// 1-based position of the question in the attempt
    pub number: u32,
    pub kind: QuestionKind,
    pub text: String,
    pub options: Vec<String>,
    /// Option indices checked when the page loads
    pub selected: Vec<u8>,
    /// Countdown starting value; `None` leaves the attribute off
    pub remaining: Option<AttrValue>,
    pub timer: bool,
    pub timer_display: bool,
    pub finish_button: bool,
}

impl Default for QuestionPage {
    fn default() -> Self {
        Self {
            attempt_id: 1,
            number: 1,
            kind: QuestionKind::SingleChoice,
            text: String::new(),
            options: Vec::new(),
            selected: Vec::new(),
            remaining: None,
            timer: true,
            timer_display: true,
            finish_button: true,
        }
    }
}

impl QuestionPage {
    pub fn new(kind: QuestionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Load a page description from a JSON fixture file
    pub fn from_fixture(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid page fixture {}", path.display()))
    }

    pub fn attempt(mut self, attempt_id: u64, number: u32) -> Self {
        self.attempt_id = attempt_id;
        self.number = number;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn remaining_seconds(mut self, seconds: u64) -> Self {
        self.remaining = Some(AttrValue::Number(i64::try_from(seconds).unwrap_or(i64::MAX)));
        self
    }

    /// Set the countdown attribute verbatim
    pub fn remaining_raw(mut self, raw: &str) -> Self {
        self.remaining = Some(AttrValue::Text(raw.to_string()));
        self
    }

    pub fn selected(mut self, selected: &[u8]) -> Self {
        self.selected = selected.to_vec();
        self
    }

    pub fn without_timer(mut self) -> Self {
        self.timer = false;
        self
    }

    pub fn without_timer_display(mut self) -> Self {
        self.timer_display = false;
        self
    }

    pub fn without_finish_button(mut self) -> Self {
        self.finish_button = false;
        self
    }

    pub fn confirm_action(&self) -> String {
        format!("/quiz/{}/{}/confirm", self.attempt_id, self.number)
    }

    pub fn skip_action(&self) -> String {
        format!("/quiz/{}/{}/skip", self.attempt_id, self.number)
    }

    pub fn finish_action(&self) -> String {
        format!("/quiz/{}/finish", self.attempt_id)
    }

    /// Lay the page out: countdown, answer form with one control per option,
    /// then the confirm, skip and finish buttons inside the form.
    pub fn build(&self) -> MemoryPage {
        let page = MemoryPage::new();

        if self.timer {
            let mut timer = Element::new("div").with_class("timer");
            if let Some(remaining) = &self.remaining {
                timer = timer.with_attr(REMAINING_ATTR, &remaining.render());
            }
            let timer = page.append(None, timer);
            if self.timer_display {
                page.append(Some(timer), Element::new("span").with_class("mmss").with_text("--:--"));
            }
        }

        let form = page.append(
            None,
            Element::new("form")
                .with_id("answerForm")
                .with_attr("method", "post")
                .with_attr("action", &self.confirm_action()),
        );
        page.append(Some(form), Element::new("p").with_class("question").with_text(&self.text));

        let input_kind = self.kind.input_kind();
        for index in 0..OPTION_COUNT {
            let label_text = self
                .options
                .get(usize::from(index))
                .cloned()
                .unwrap_or_else(|| format!("Option {}", index + 1));
            let label = page.append(Some(form), Element::new("label").with_text(&label_text));
            page.append(
                Some(label),
                Element::input(input_kind, "selected", &index.to_string())
                    .checked(self.selected.contains(&index)),
            );
        }

        page.append(
            Some(form),
            Element::new("button")
                .with_id("confirmBtn")
                .with_attr("type", "submit")
                .with_attr("formaction", &self.confirm_action())
                .with_text("Confirm")
                .disabled(true),
        );
        page.append(
            Some(form),
            Element::new("button")
                .with_attr("type", "submit")
                .with_attr("formaction", &self.skip_action())
                .with_text("Skip"),
        );
        if self.finish_button {
            page.append(
                Some(form),
                Element::new("button")
                    .with_attr("type", "submit")
                    .with_attr("formaction", &self.finish_action())
                    .with_text("Finish"),
            );
        }

        page
    }
}
