//! In-memory page with native form-control semantics

use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{ChangeHandler, ElementId, InputKind, Page, Selector};

/// A single element of a `MemoryPage`
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub parent: Option<ElementId>,
    pub text: String,
    pub checked: bool,
    pub disabled: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// An `<input>` of the given kind
    pub fn input(kind: InputKind, name: &str, value: &str) -> Self {
        Self::new("input")
            .with_attr("type", kind.as_str())
            .with_attr("name", name)
            .with_attr("value", value)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Kind of this element when it is a radio or checkbox input
    pub fn input_kind(&self) -> Option<InputKind> {
        if self.tag != "input" {
            return None;
        }
        self.attributes
            .get("type")
            .and_then(|t| InputKind::from_type_attr(t))
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(*id),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::FormActionSuffix(suffix) => {
                self.tag == "button"
                    && self
                        .attributes
                        .get("formaction")
                        .is_some_and(|action| action.ends_with(suffix))
            }
            Selector::Inputs(kinds) => self.input_kind().is_some_and(|k| kinds.contains(&k)),
        }
    }
}

/// A form submission triggered by clicking a button with a `formaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub action: String,
    /// `value` attributes of the checked controls in the submitting form
    pub values: Vec<String>,
}

#[derive(Debug, Default)]
struct PageInner {
    elements: Vec<Element>,
    clicks: Vec<ElementId>,
    submissions: Vec<Submission>,
}

/// Page held entirely in memory.
///
/// Document order is insertion order. Radios sharing a `name` within the same
/// form are mutually exclusive, change events fire only on the control whose
/// state was changed, and disabled buttons ignore clicks.
#[derive(Default)]
pub struct MemoryPage {
    inner: Mutex<PageInner>,
    listeners: Mutex<HashMap<ElementId, Vec<ChangeHandler>>>,
}

impl fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner();
        f.debug_struct("MemoryPage")
            .field("elements", &inner.elements.len())
            .field("submissions", &inner.submissions)
            .finish()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, PageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `element` under `parent` and return its handle
    pub fn append(&self, parent: Option<ElementId>, mut element: Element) -> ElementId {
        let mut inner = self.inner();
        element.parent = parent.filter(|p| *p < inner.elements.len());
        inner.elements.push(element);
        inner.elements.len() - 1
    }

    /// Snapshot of an element
    pub fn element(&self, element: ElementId) -> Option<Element> {
        self.inner().elements.get(element).cloned()
    }

    pub fn text(&self, element: ElementId) -> Option<String> {
        self.inner().elements.get(element).map(|e| e.text.clone())
    }

    pub fn is_disabled(&self, element: ElementId) -> bool {
        self.inner().elements.get(element).is_some_and(|e| e.disabled)
    }

    /// Every element clicked so far, disabled ones excluded
    pub fn clicks(&self) -> Vec<ElementId> {
        self.inner().clicks.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.inner().submissions.clone()
    }

    /// Number of change handlers registered on `element`
    pub fn listener_count(&self, element: ElementId) -> usize {
        self.listeners
            .lock()
            .map(|l| l.get(&element).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Change the checked state of a radio or checkbox the way a user would,
    /// then dispatch a change event on it if its state actually changed.
    pub fn set_checked(&self, element: ElementId, checked: bool) -> Result<(), String> {
        let changed = {
            let mut inner = self.inner();
            let target = inner
                .elements
                .get(element)
                .ok_or_else(|| format!("No element with handle {}", element))?;
            let kind = target
                .input_kind()
                .ok_or_else(|| format!("Element {} is not a radio or checkbox", element))?;
            if target.disabled {
                return Err(format!("Element {} is disabled", element));
            }
            if target.checked == checked {
                false
            } else {
                if kind == InputKind::Radio && checked {
                    uncheck_radio_group(&mut inner, element);
                }
                inner.elements[element].checked = checked;
                true
            }
        };

        if changed {
            self.dispatch_change(element);
        }
        Ok(())
    }

    fn dispatch_change(&self, element: ElementId) {
        // Handlers re-enter the page, so they run without any lock held.
        let handlers: Vec<ChangeHandler> = match self.listeners.lock() {
            Ok(listeners) => listeners.get(&element).cloned().unwrap_or_default(),
            Err(e) => e.into_inner().get(&element).cloned().unwrap_or_default(),
        };
        trace!("Dispatching change on element {} to {} handlers", element, handlers.len());
        for handler in handlers {
            handler();
        }
    }
}

fn is_descendant(elements: &[Element], mut element: ElementId, ancestor: ElementId) -> bool {
    while let Some(parent) = elements.get(element).and_then(|e| e.parent) {
        if parent == ancestor {
            return true;
        }
        element = parent;
    }
    false
}

fn enclosing_form(elements: &[Element], mut element: ElementId) -> Option<ElementId> {
    while let Some(parent) = elements.get(element).and_then(|e| e.parent) {
        if elements[parent].tag == "form" {
            return Some(parent);
        }
        element = parent;
    }
    None
}

fn uncheck_radio_group(inner: &mut PageInner, element: ElementId) {
    let name = inner.elements[element].attributes.get("name").cloned();
    let form = enclosing_form(&inner.elements, element);
    let Some(name) = name else {
        return;
    };

    let group: Vec<ElementId> = (0..inner.elements.len())
        .filter(|&i| i != element)
        .filter(|&i| {
            let other = &inner.elements[i];
            other.input_kind() == Some(InputKind::Radio)
                && other.attributes.get("name") == Some(&name)
                && enclosing_form(&inner.elements, i) == form
        })
        .collect();
    for i in group {
        inner.elements[i].checked = false;
    }
}

impl Page for MemoryPage {
    fn query_element(&self, selector: &Selector) -> Option<ElementId> {
        self.inner().elements.iter().position(|e| e.matches(selector))
    }

    fn query_all_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        let inner = self.inner();
        inner
            .elements
            .iter()
            .enumerate()
            .filter(|(i, e)| e.matches(selector) && is_descendant(&inner.elements, *i, scope))
            .map(|(i, _)| i)
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.inner()
            .elements
            .get(element)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn set_text(&self, element: ElementId, text: &str) {
        if let Some(e) = self.inner().elements.get_mut(element) {
            e.text = text.to_string();
        }
    }

    fn is_checked(&self, element: ElementId) -> bool {
        self.inner().elements.get(element).is_some_and(|e| e.checked)
    }

    fn set_disabled(&self, element: ElementId, disabled: bool) {
        if let Some(e) = self.inner().elements.get_mut(element) {
            e.disabled = disabled;
        }
    }

    fn click(&self, element: ElementId) {
        let mut inner = self.inner();
        let Some(target) = inner.elements.get(element) else {
            return;
        };
        if target.disabled {
            debug!("Ignoring click on disabled element {}", element);
            return;
        }

        let action = target.attributes.get("formaction").cloned();
        inner.clicks.push(element);

        if let Some(action) = action {
            let values = match enclosing_form(&inner.elements, element) {
                Some(form) => inner
                    .elements
                    .iter()
                    .enumerate()
                    .filter(|(i, e)| {
                        e.checked && e.input_kind().is_some() && is_descendant(&inner.elements, *i, form)
                    })
                    .filter_map(|(_, e)| e.attributes.get("value").cloned())
                    .collect(),
                None => Vec::new(),
            };
            debug!("Form submitted to {} with values {:?}", action, values);
            inner.submissions.push(Submission { action, values });
        }
    }

    fn on_change(&self, element: ElementId, handler: ChangeHandler) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.entry(element).or_default().push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn radio_form() -> (MemoryPage, ElementId, Vec<ElementId>) {
        let page = MemoryPage::new();
        let form = page.append(None, Element::new("form").with_id("answerForm"));
        let inputs = (0..3)
            .map(|i| page.append(Some(form), Element::input(InputKind::Radio, "selected", &i.to_string())))
            .collect();
        (page, form, inputs)
    }

    #[test]
    fn radios_in_a_group_are_exclusive() {
        let (page, _, inputs) = radio_form();
        page.set_checked(inputs[0], true).unwrap();
        page.set_checked(inputs[2], true).unwrap();
        assert!(!page.is_checked(inputs[0]));
        assert!(page.is_checked(inputs[2]));
    }

    #[test]
    fn change_fires_only_on_actual_change() {
        let (page, _, inputs) = radio_form();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        page.on_change(inputs[1], Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        page.set_checked(inputs[1], true).unwrap();
        page.set_checked(inputs[1], true).unwrap();
        // Unchecked as a side effect of a sibling: no event on this control.
        page.set_checked(inputs[0], true).unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!page.is_checked(inputs[1]));
    }

    #[test]
    fn query_within_is_scoped_to_descendants() {
        let (page, form, inputs) = radio_form();
        page.append(None, Element::input(InputKind::Checkbox, "other", "9"));
        let found = page.query_all_within(form, &crate::dom::selector::WATCHED_INPUTS);
        assert_eq!(found, inputs);
    }

    #[test]
    fn clicking_submit_button_records_checked_values() {
        let (page, form, inputs) = radio_form();
        let finish = page.append(
            Some(form),
            Element::new("button").with_attr("formaction", "/quiz/1/finish"),
        );
        page.set_checked(inputs[2], true).unwrap();
        page.click(finish);

        assert_eq!(
            page.submissions(),
            vec![Submission { action: "/quiz/1/finish".into(), values: vec!["2".into()] }]
        );
    }

    #[test]
    fn disabled_button_ignores_clicks() {
        let page = MemoryPage::new();
        let button = page.append(
            None,
            Element::new("button").with_attr("formaction", "/x/confirm").disabled(true),
        );
        page.click(button);
        assert!(page.clicks().is_empty());
        assert!(page.submissions().is_empty());
    }

    #[test]
    fn set_checked_rejects_non_inputs() {
        let page = MemoryPage::new();
        let div = page.append(None, Element::new("div"));
        assert!(page.set_checked(div, true).is_err());
        assert!(page.set_checked(42, true).is_err());
    }
}
