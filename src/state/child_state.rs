//! Child feature display data

use serde::{Deserialize, Serialize};

/// Static data shown by the child feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildState {
    pub title: String,
}

impl ChildState {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for ChildState {
    fn default() -> Self {
        Self::new("Child Feature")
    }
}
