//! Published state and the actions that change it

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChildState, TimerState};

/// Everything a subscriber needs to render the timer feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimersSnapshot {
    #[serde(flatten)]
    pub timer: TimerState,
    pub child: ChildState,
    pub torn_down: bool,
}

impl TimersSnapshot {
    pub fn phase(&self) -> Phase {
        if self.torn_down {
            Phase::TornDown
        } else if self.timer.is_active {
            Phase::Running
        } else {
            Phase::Idle
        }
    }
}

/// Lifecycle phase of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Running,
    TornDown,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::TornDown => "torn-down",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ToggleTimer,
    TimerTicked,
    Teardown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ToggleTimer => "toggle-timer",
            Action::TimerTicked => "timer-ticked",
            Action::Teardown => "teardown",
        })
    }
}
