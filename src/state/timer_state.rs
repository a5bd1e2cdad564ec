//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// Activity flag and elapsed-seconds counter of the timer feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub is_active: bool,
    pub seconds_elapsed: u64,
}

impl TimerState {
    /// Create a new inactive timer state at zero seconds
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the activity flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    /// Count one elapsed second. Inactive timers do not count.
    pub fn record_tick(&mut self) -> bool {
        if !self.is_active {
            return false;
        }
        self.seconds_elapsed = self.seconds_elapsed.saturating_add(1);
        true
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
