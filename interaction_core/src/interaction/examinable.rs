//! Examinable objects - things the player can look at and confirm on.

use scene_rules::{
    ColliderId, ContentLibrary, DialogueScript, ExaminableId, ExaminableSettings, LoadMode,
};

use crate::dialogue::DialogueCallback;
use crate::events::{EventLog, SceneEvent};
use crate::quest::QuestTracker;
use crate::scene::{Completion, Services};

/// What an `examine` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamineOutcome {
    /// An earlier interaction has not finished yet (or the object is spent).
    AlreadyInteracted,
    SceneChangeRequested,
    /// Scene change configured without a destination.
    MissingScene,
    /// A dialogue opened; completion runs when it ends naturally.
    DialogueStarted,
    /// Completed on the spot.
    Completed,
}

#[derive(Debug, Clone)]
pub struct Examinable {
    id: ExaminableId,
    settings: ExaminableSettings,
    script: Option<DialogueScript>,
    has_interacted: bool,
}

impl Examinable {
    /// Build an examinable, resolving its dialogue from `library`.
    pub fn new(id: ExaminableId, settings: ExaminableSettings, library: &ContentLibrary) -> Self {
        let script = settings.dialogue.as_deref().and_then(|key| {
            let script = library.dialogue(key).cloned();
            if script.is_none() {
                tracing::warn!(examinable = %id, key, "dialogue not found in content library");
            }
            script
        });

        Self {
            id,
            settings,
            script,
            has_interacted: false,
        }
    }

    pub fn id(&self) -> ExaminableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn collider(&self) -> ColliderId {
        self.settings.collider
    }

    pub fn settings(&self) -> &ExaminableSettings {
        &self.settings
    }

    pub fn script(&self) -> Option<&DialogueScript> {
        self.script.as_ref()
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Prompt label: the dialogue's speaker, if there is one.
    pub fn label(&self) -> Option<&str> {
        self.script
            .as_ref()
            .map(|s| s.speaker.as_str())
            .filter(|speaker| !speaker.is_empty())
    }

    pub fn examine(&mut self, services: &mut Services) -> ExamineOutcome {
        if self.has_interacted {
            tracing::debug!(examinable = %self.id, "examine ignored, interaction in progress or spent");
            return ExamineOutcome::AlreadyInteracted;
        }

        self.has_interacted = true;
        tracing::info!(examinable = %self.id, name = %self.settings.name, "examined");
        services
            .events
            .emit(SceneEvent::Examined { examinable: self.id });

        if self.settings.interact_only_once {
            services
                .physics
                .set_collider_enabled(self.settings.collider, false);
        }

        if self.settings.change_scene {
            return self.change_scene(services);
        }

        if let Some(script) = &self.script {
            let id = self.id;
            let on_complete: DialogueCallback = Box::new(move |done: &mut Completion<'_>| {
                match done.examinables.iter_mut().find(|e| e.id() == id) {
                    Some(examinable) => {
                        examinable.complete_interaction(&mut *done.quest, &mut *done.events)
                    }
                    None => tracing::warn!(examinable = %id, "examinable gone before its dialogue ended"),
                }
            });
            let started = services.dialogue.start(
                script,
                true,
                Some(on_complete),
                &mut services.input,
                &mut services.events,
            );
            if started {
                return ExamineOutcome::DialogueStarted;
            }
        }

        self.complete_interaction(&mut services.quest, &mut services.events);
        ExamineOutcome::Completed
    }

    /// Finish an interaction: re-arm unless single-use, then advance the
    /// quest if configured.
    pub fn complete_interaction(&mut self, quest: &mut QuestTracker, events: &mut EventLog) {
        if !self.settings.interact_only_once {
            self.has_interacted = false;
        }
        if self.settings.advance_quest {
            quest.advance_step(events);
        }
    }

    fn change_scene(&mut self, services: &mut Services) -> ExamineOutcome {
        let target = self
            .settings
            .target_scene
            .as_deref()
            .filter(|name| !name.is_empty());

        let Some(target) = target else {
            tracing::warn!(examinable = %self.id, "scene change requested without a target scene");
            if !self.settings.interact_only_once {
                self.has_interacted = false;
            }
            return ExamineOutcome::MissingScene;
        };

        tracing::info!(examinable = %self.id, scene = target, "loading scene");
        services.loader.pause_audio();
        services.loader.load_scene(target, LoadMode::Immediate);
        services.events.emit(SceneEvent::SceneLoadRequested {
            scene: target.to_string(),
            mode: LoadMode::Immediate,
        });
        ExamineOutcome::SceneChangeRequested
    }
}
