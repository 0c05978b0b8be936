//! Page capability module
//!
//! The behaviors never touch a rendering engine directly. They look elements
//! up and subscribe to change events through the `Page` trait, which the
//! in-memory `MemoryPage` implements for the harness and for tests.

pub mod memory;
pub mod selector;

use std::sync::Arc;

// Re-export main types
pub use memory::{Element, MemoryPage, Submission};
pub use selector::{InputKind, Selector};

/// Handle to an element of a page
pub type ElementId = usize;

/// Callback invoked after a watched control changed state
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync>;

/// Capabilities a page exposes to the behaviors
pub trait Page: Send + Sync {
    /// First element in the document matching `selector`
    fn query_element(&self, selector: &Selector) -> Option<ElementId>;

    /// All descendants of `scope` matching `selector`, in document order
    fn query_all_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId>;

    /// First descendant of `scope` matching `selector`
    fn query_within(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.query_all_within(scope, selector).into_iter().next()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Replace the text content of `element`
    fn set_text(&self, element: ElementId, text: &str);

    fn is_checked(&self, element: ElementId) -> bool;

    fn set_disabled(&self, element: ElementId, disabled: bool);

    /// Activate `element` as if the user clicked it
    fn click(&self, element: ElementId);

    /// Register `handler` for change events on `element`
    fn on_change(&self, element: ElementId, handler: ChangeHandler);
}
