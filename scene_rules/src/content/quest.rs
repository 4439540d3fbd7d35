//! Quest definitions.

use serde::{Deserialize, Serialize};

/// A linear quest: an ordered list of step descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestData {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl QuestData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, text: impl Into<String>) -> Self {
        self.steps.push(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step, or `None` for a quest without steps.
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Clamp a requested step into `[0, len - 1]`.
    pub fn clamp_step(&self, index: usize) -> Option<usize> {
        self.last_index().map(|last| index.min(last))
    }

    pub fn step(&self, index: usize) -> Option<&str> {
        self.steps.get(index).map(String::as_str)
    }
}
