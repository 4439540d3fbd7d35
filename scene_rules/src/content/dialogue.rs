//! Dialogue scripts.

use serde::{Deserialize, Serialize};

/// An ordered list of lines spoken by a single speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DialogueScript {
    pub speaker: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// One rendered line of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub speaker: &'a str,
    pub text: &'a str,
}

impl DialogueScript {
    /// Create a script for the given speaker.
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            lines: Vec::new(),
        }
    }

    /// Append a line.
    pub fn with_line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Append several lines.
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// A script with no lines cannot be started.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Get the line at `index`, paired with the speaker.
    pub fn line(&self, index: usize) -> Option<Line<'_>> {
        self.lines.get(index).map(|text| Line {
            speaker: &self.speaker,
            text,
        })
    }
}

impl std::fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}
