//! Background tasks module
//!
//! This module contains the tick source driving the timer and the
//! subscriber task that runs alongside the HTTP server.

pub mod ticker;
pub mod render_logger;

// Re-export main items
pub use ticker::{TickSink, TickSource};
pub use render_logger::render_logger_task;
