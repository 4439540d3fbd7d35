//! Content library - scripts and quests addressed by key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DialogueScript, QuestData};

/// Named dialogue scripts and quests shared by a scene.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContentLibrary {
    #[serde(default)]
    pub dialogues: HashMap<String, DialogueScript>,
    #[serde(default)]
    pub quests: HashMap<String, QuestData>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialogue(mut self, key: impl Into<String>, script: DialogueScript) -> Self {
        self.dialogues.insert(key.into(), script);
        self
    }

    pub fn with_quest(mut self, key: impl Into<String>, quest: QuestData) -> Self {
        self.quests.insert(key.into(), quest);
        self
    }

    pub fn dialogue(&self, key: &str) -> Option<&DialogueScript> {
        self.dialogues.get(key)
    }

    pub fn quest(&self, key: &str) -> Option<&QuestData> {
        self.quests.get(key)
    }
}
