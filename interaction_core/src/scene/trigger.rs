//! Scene triggers - volumes that load another scene when the player walks in.

use scene_rules::{ColliderId, SceneTriggerSettings, TriggerId};

use crate::events::SceneEvent;
use crate::scene::Services;

#[derive(Debug, Clone)]
pub struct SceneTrigger {
    id: TriggerId,
    settings: SceneTriggerSettings,
    triggered: bool,
}

impl SceneTrigger {
    pub fn new(id: TriggerId, settings: SceneTriggerSettings) -> Self {
        Self {
            id,
            settings,
            triggered: false,
        }
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn collider(&self) -> ColliderId {
        self.settings.collider
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    /// React to something entering the volume. Returns true when a load was
    /// requested.
    pub fn on_enter(&mut self, is_player: bool, services: &mut Services) -> bool {
        if self.triggered || !is_player {
            return false;
        }

        let Some(scene) = self
            .settings
            .scene_name
            .as_deref()
            .filter(|name| !name.is_empty())
        else {
            tracing::warn!(trigger = %self.id, name = %self.settings.name, "scene trigger has no scene name");
            return false;
        };

        self.triggered = true;
        let mode = self.settings.load_mode;
        tracing::info!(trigger = %self.id, scene, ?mode, "scene trigger fired");

        services.input.disable();
        services.loader.pause_audio();
        services.loader.load_scene(scene, mode);
        services.events.emit(SceneEvent::SceneLoadRequested {
            scene: scene.to_string(),
            mode,
        });
        true
    }
}
