//! Quiz Page - countdown auto-finish and answer-selection gate for quiz pages
//!
//! The two page behaviors run against any `dom::Page`. The crate also ships an
//! in-memory page, the quiz page model it is laid out from, and an HTTP harness
//! that exposes a running page.

pub mod api;
pub mod behaviors;
pub mod config;
pub mod dom;
pub mod quiz;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use behaviors::{init_page, CountdownConfig, PageBehaviors, TickMode};
pub use config::Config;
pub use dom::{MemoryPage, Page};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
