//! Per-object settings for interaction targets, cinematics, and triggers.
//!
//! Every struct here deserializes from a partial table: missing fields fall
//! back to the `Default` impl, matching what a designer gets from a freshly
//! placed object.

mod manifest;

pub use manifest::*;

use serde::{Deserialize, Serialize};

use crate::content::{ClipRef, SoundRef};
use crate::ids::ColliderId;
use crate::mechanics::{LayerMask, LoadMode};

/// Label shown for examinables without an attached script.
pub const DEFAULT_EXAMINE_LABEL: &str = "Examine";

/// Label shown for cinematics that do not set one.
pub const DEFAULT_CINEMATIC_LABEL: &str = "Cinematic";

/// Blend time used when an animation event cross-fades the actor.
pub const ACTOR_CROSS_FADE_SECS: f32 = 0.1;

/// Settings for the crosshair raycast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Maximum ray length in world units.
    pub max_distance: f32,
    pub layer_mask: LayerMask,
    /// Prompt label for examinables that have no dialogue speaker.
    pub fallback_label: String,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            max_distance: 3.0,
            layer_mask: LayerMask::EVERYTHING,
            fallback_label: DEFAULT_EXAMINE_LABEL.to_string(),
        }
    }
}

/// When a cinematic moves the active quest forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuestAdvancePolicy {
    pub advance_on_stop: bool,
    /// Clip indices whose completion advances the quest. Empty means "any".
    pub clip_filter: Vec<usize>,
}

impl QuestAdvancePolicy {
    pub fn always() -> Self {
        Self {
            advance_on_stop: true,
            clip_filter: Vec::new(),
        }
    }

    pub fn on_clips(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            advance_on_stop: true,
            clip_filter: indices.into_iter().collect(),
        }
    }

    /// Decide whether finishing `played_index` advances the quest.
    ///
    /// Without a clip list or without a filter every stop advances; otherwise
    /// only filtered indices do.
    pub fn should_advance(&self, has_clips: bool, played_index: usize) -> bool {
        if !self.advance_on_stop {
            return false;
        }
        if !has_clips || self.clip_filter.is_empty() {
            return true;
        }
        self.clip_filter.contains(&played_index)
    }
}

/// A named cue fired some time after an animation event requests it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEventSettings {
    pub name: String,
    #[serde(default)]
    pub delay_secs: f32,
}

impl TimedEventSettings {
    pub fn new(name: impl Into<String>, delay_secs: f32) -> Self {
        Self {
            name: name.into(),
            delay_secs,
        }
    }
}

/// Authored configuration of a cinematic player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinematicSettings {
    /// Key used to bind collaborators when building from a manifest.
    pub name: String,
    pub label: String,

    pub interaction_collider: Option<ColliderId>,
    pub interaction_once: bool,

    pub trigger_collider: Option<ColliderId>,
    pub trigger_once: bool,

    /// Clips to play. Empty means "ask the animation host for its clips".
    pub clips: Vec<ClipRef>,
    pub start_clip_index: usize,
    pub advance_on_each_play: bool,

    pub sfx: Vec<SoundRef>,
    /// Dialogue keys addressable by the `TriggerDialogue` animation event.
    pub dialogues: Vec<String>,
    pub timed_events: Vec<TimedEventSettings>,
    pub quest: QuestAdvancePolicy,
}

impl Default for CinematicSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: DEFAULT_CINEMATIC_LABEL.to_string(),
            interaction_collider: None,
            interaction_once: false,
            trigger_collider: None,
            trigger_once: false,
            clips: Vec::new(),
            start_clip_index: 0,
            advance_on_each_play: false,
            sfx: Vec::new(),
            dialogues: Vec::new(),
            timed_events: Vec::new(),
            quest: QuestAdvancePolicy::default(),
        }
    }
}

impl CinematicSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_interaction_collider(mut self, collider: ColliderId, once: bool) -> Self {
        self.interaction_collider = Some(collider);
        self.interaction_once = once;
        self
    }

    pub fn with_trigger_collider(mut self, collider: ColliderId, once: bool) -> Self {
        self.trigger_collider = Some(collider);
        self.trigger_once = once;
        self
    }

    pub fn with_clips<I, S>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clips = clips.into_iter().map(ClipRef::new).collect();
        self
    }

    pub fn with_start_clip(mut self, index: usize) -> Self {
        self.start_clip_index = index;
        self
    }

    pub fn advancing(mut self) -> Self {
        self.advance_on_each_play = true;
        self
    }

    pub fn with_sfx(mut self, sound: SoundRef) -> Self {
        self.sfx.push(sound);
        self
    }

    pub fn with_dialogue(mut self, key: impl Into<String>) -> Self {
        self.dialogues.push(key.into());
        self
    }

    pub fn with_timed_event(mut self, event: TimedEventSettings) -> Self {
        self.timed_events.push(event);
        self
    }

    pub fn with_quest_policy(mut self, policy: QuestAdvancePolicy) -> Self {
        self.quest = policy;
        self
    }
}

/// Authored configuration of an examinable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExaminableSettings {
    pub name: String,
    pub collider: ColliderId,
    /// Dialogue key in the content library.
    pub dialogue: Option<String>,
    pub interact_only_once: bool,
    pub change_scene: bool,
    pub target_scene: Option<String>,
    pub advance_quest: bool,
}

impl ExaminableSettings {
    pub fn new(name: impl Into<String>, collider: ColliderId) -> Self {
        Self {
            name: name.into(),
            collider,
            ..Self::default()
        }
    }

    pub fn with_dialogue(mut self, key: impl Into<String>) -> Self {
        self.dialogue = Some(key.into());
        self
    }

    pub fn once(mut self) -> Self {
        self.interact_only_once = true;
        self
    }

    pub fn changing_scene(mut self, target: Option<String>) -> Self {
        self.change_scene = true;
        self.target_scene = target;
        self
    }

    pub fn advancing_quest(mut self) -> Self {
        self.advance_quest = true;
        self
    }
}

/// A proximity volume that loads another scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneTriggerSettings {
    pub name: String,
    pub collider: ColliderId,
    pub scene_name: Option<String>,
    pub load_mode: LoadMode,
}

impl SceneTriggerSettings {
    pub fn new(name: impl Into<String>, collider: ColliderId, scene_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            collider,
            scene_name,
            load_mode: LoadMode::default(),
        }
    }
}
