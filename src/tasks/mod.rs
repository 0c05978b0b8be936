//! Background tasks module
//!
//! This module contains background tasks that run alongside the harness server.

pub mod countdown_monitor;

// Re-export main functions
pub use countdown_monitor::countdown_monitor_task;
