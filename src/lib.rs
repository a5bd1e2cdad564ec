//! Timers - a cancellable one-second timer with explicit state notification
//!
//! This library provides the timer controller, its tick source, the
//! subscribe/notify interface and the HTTP surface used to drive it.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::ConfigError;
pub use state::{Action, AppState, ChildState, Phase, Subscription, TimerController, TimerState, TimersSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
