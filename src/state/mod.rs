//! State management module
//!
//! This module contains the timer and child state, the controller that owns
//! them and the subscription handle used to observe it.

pub mod timer_state;
pub mod child_state;
pub mod snapshot;
pub mod controller;
pub mod subscription;
pub mod app_state;

// Re-export main types
pub use timer_state::TimerState;
pub use child_state::ChildState;
pub use snapshot::{Action, Phase, TimersSnapshot};
pub use controller::TimerController;
pub use subscription::Subscription;
pub use app_state::AppState;
