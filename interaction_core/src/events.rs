//! Scene events - the observer surface for hosts.
//!
//! The core records what happened during a call; hosts either subscribe a
//! callback at startup or drain the queue once per frame.

use scene_rules::{CinematicId, ExaminableId, LoadMode};
use serde::{Deserialize, Serialize};

/// Something observable that happened inside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// The "any cinematic playing" flag flipped. Fires only on 0->1 and 1->0.
    PlaybackStateChanged { any_playing: bool },

    CinematicStarted {
        cinematic: CinematicId,
        clip: Option<String>,
    },

    CinematicEnded {
        cinematic: CinematicId,
        clip_index: usize,
    },

    /// A named cue raised by an animation event.
    CinematicSignal { cinematic: CinematicId, name: String },

    /// A timed cue scheduled by an animation event came due.
    TimedEvent { cinematic: CinematicId, name: String },

    DialogueOpened { speaker: String },

    /// The panel closed; `forced` is true when the completion callback was skipped.
    DialogueClosed { forced: bool },

    QuestStarted { quest: String, step: usize },

    QuestStepChanged { quest: String, step: usize },

    Examined { examinable: ExaminableId },

    SceneLoadRequested { scene: String, mode: LoadMode },
}

impl SceneEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneEvent::PlaybackStateChanged { .. } => "playback_state_changed",
            SceneEvent::CinematicStarted { .. } => "cinematic_started",
            SceneEvent::CinematicEnded { .. } => "cinematic_ended",
            SceneEvent::CinematicSignal { .. } => "cinematic_signal",
            SceneEvent::TimedEvent { .. } => "timed_event",
            SceneEvent::DialogueOpened { .. } => "dialogue_opened",
            SceneEvent::DialogueClosed { .. } => "dialogue_closed",
            SceneEvent::QuestStarted { .. } => "quest_started",
            SceneEvent::QuestStepChanged { .. } => "quest_step_changed",
            SceneEvent::Examined { .. } => "examined",
            SceneEvent::SceneLoadRequested { .. } => "scene_load_requested",
        }
    }

    /// JSON form for hosts that forward events to analytics or a debug overlay.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub type EventCallback = Box<dyn FnMut(&SceneEvent)>;

/// Subscribers plus a queue of events not yet drained.
#[derive(Default)]
pub struct EventLog {
    pending: Vec<SceneEvent>,
    subscribers: Vec<EventCallback>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously for every event.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.subscribers.push(callback);
    }

    pub fn emit(&mut self, event: SceneEvent) {
        tracing::trace!(kind = event.kind(), "scene event");
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
        self.pending.push(event);
    }

    /// Events emitted since the last drain, oldest first.
    pub fn pending(&self) -> &[SceneEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
