//! Scene manifest - the complete authored description of one scene.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::{CinematicSettings, ExaminableSettings, InteractionSettings, SceneTriggerSettings};
use crate::content::ContentLibrary;
use crate::ids::ColliderId;

/// Errors raised while loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse scene manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("interaction distance must be a positive finite number, got {0}")]
    InvalidDistance(f32),

    #[error("duplicate object name '{0}'")]
    DuplicateName(String),

    #[error("collider {0} is used by more than one interaction target")]
    DuplicateCollider(ColliderId),
}

/// Quest the scene starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingQuest {
    pub key: String,
    #[serde(default)]
    pub step: usize,
}

/// Everything needed to compose a scene, minus the host collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneManifest {
    pub interaction: InteractionSettings,
    pub content: ContentLibrary,
    pub starting_quest: Option<StartingQuest>,
    pub cinematics: Vec<CinematicSettings>,
    pub examinables: Vec<ExaminableSettings>,
    pub scene_triggers: Vec<SceneTriggerSettings>,
}

impl SceneManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: SceneManifest = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check invariants a designer can break by hand-editing the file.
    ///
    /// Out-of-range start indices are not errors; they are clamped when the
    /// scene is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distance = self.interaction.max_distance;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(ConfigError::InvalidDistance(distance));
        }

        let mut names = HashSet::new();
        let all_names = self
            .cinematics
            .iter()
            .map(|c| &c.name)
            .chain(self.examinables.iter().map(|e| &e.name))
            .chain(self.scene_triggers.iter().map(|t| &t.name));
        for name in all_names {
            if !name.is_empty() && !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }

        // Raycast targets: at most one owner per collider.
        let mut interaction_colliders = HashSet::new();
        let raycast_targets = self
            .cinematics
            .iter()
            .filter_map(|c| c.interaction_collider)
            .chain(self.examinables.iter().map(|e| e.collider));
        for collider in raycast_targets {
            if !interaction_colliders.insert(collider) {
                return Err(ConfigError::DuplicateCollider(collider));
            }
        }

        // Proximity volumes: same rule, separate namespace.
        let mut trigger_colliders = HashSet::new();
        let volumes = self
            .cinematics
            .iter()
            .filter_map(|c| c.trigger_collider)
            .chain(self.scene_triggers.iter().map(|t| t.collider));
        for collider in volumes {
            if !trigger_colliders.insert(collider) {
                return Err(ConfigError::DuplicateCollider(collider));
            }
        }

        Ok(())
    }
}
