//! Authored content: dialogue scripts, quests, clips, and the library that
//! holds them by key.

mod dialogue;
mod library;
mod quest;

pub use dialogue::*;
pub use library::*;
pub use quest::*;

use serde::{Deserialize, Serialize};

/// Reference to an animation clip by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipRef {
    pub name: String,
}

impl ClipRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for ClipRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Handle of a one-shot sound understood by the audio host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundRef(pub String);

impl SoundRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for SoundRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
