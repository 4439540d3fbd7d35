//! Scene - the composition root.
//!
//! A [`Scene`] owns every piece of interaction state for one loaded level:
//! the input gate, the playback counter, the dialogue sequencer, the quest
//! tracker, the registry of crosshair targets, and the cinematics,
//! examinables and scene triggers placed in the level. Hosts build one with
//! [`SceneBuilder`], call [`Scene::tick`] once per frame, and forward
//! animation events and trigger-volume entries between ticks.

mod trigger;

#[cfg(test)]
mod scenarios;

pub use trigger::*;

use std::collections::{HashMap, HashSet};

use scene_rules::{
    CinematicId, CinematicSettings, ColliderId, ContentLibrary, DialogueScript, ExaminableId,
    ExaminableSettings, InteractionSettings, SceneManifest, SceneTriggerSettings, SoundRef,
    StartingQuest, TriggerId,
};

use crate::cinematic::{AnimationEvent, CinematicBindings, CinematicPlayer, PlayOutcome, PlaybackCounter};
use crate::dialogue::{DialogueCallback, DialogueSequencer, DialogueStep};
use crate::error::SceneError;
use crate::events::{EventCallback, EventLog, SceneEvent};
use crate::host::{
    AudioSink, DialogueView, PhysicsWorld, PlayerControls, PromptView, QuestView, SceneLoader,
    Switchable,
};
use crate::input::InputGate;
use crate::interaction::{
    Examinable, ExamineOutcome, FrameInput, InteractionRegistry, InteractionRouter, Route,
    RouteGuards,
};
use crate::quest::QuestTracker;

/// Scene-wide state that cinematics, examinables and triggers act on.
pub struct Services {
    pub input: InputGate,
    pub playback: PlaybackCounter,
    pub dialogue: DialogueSequencer,
    pub quest: QuestTracker,
    /// The player's own camera.
    pub actor_camera: Box<dyn Switchable>,
    pub physics: Box<dyn PhysicsWorld>,
    pub loader: Box<dyn SceneLoader>,
    pub events: EventLog,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            input: InputGate::default(),
            playback: PlaybackCounter::new(),
            dialogue: DialogueSequencer::default(),
            quest: QuestTracker::default(),
            actor_camera: Box::new(()),
            physics: Box::new(()),
            loader: Box::new(()),
            events: EventLog::new(),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("input", &self.input)
            .field("playback", &self.playback)
            .field("dialogue", &self.dialogue)
            .field("quest", &self.quest)
            .finish_non_exhaustive()
    }
}

/// What a dialogue completion callback may touch.
pub struct Completion<'a> {
    pub quest: &'a mut QuestTracker,
    pub examinables: &'a mut [Examinable],
    pub events: &'a mut EventLog,
}

/// Wires host collaborators and authored content into a [`Scene`].
pub struct SceneBuilder {
    controls: Box<dyn PlayerControls>,
    actor_camera: Box<dyn Switchable>,
    physics: Box<dyn PhysicsWorld>,
    loader: Box<dyn SceneLoader>,
    dialogue_view: Box<dyn DialogueView>,
    prompt_view: Box<dyn PromptView>,
    quest_view: Box<dyn QuestView>,
    quest_audio: Box<dyn AudioSink>,
    quest_sfx: Option<SoundRef>,
    interaction: InteractionSettings,
    library: ContentLibrary,
    starting_quest: Option<StartingQuest>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            controls: Box::new(()),
            actor_camera: Box::new(()),
            physics: Box::new(()),
            loader: Box::new(()),
            dialogue_view: Box::new(()),
            prompt_view: Box::new(()),
            quest_view: Box::new(()),
            quest_audio: Box::new(()),
            quest_sfx: None,
            interaction: InteractionSettings::default(),
            library: ContentLibrary::new(),
            starting_quest: None,
        }
    }

    pub fn with_controls(mut self, controls: Box<dyn PlayerControls>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_actor_camera(mut self, camera: Box<dyn Switchable>) -> Self {
        self.actor_camera = camera;
        self
    }

    pub fn with_physics(mut self, physics: Box<dyn PhysicsWorld>) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_loader(mut self, loader: Box<dyn SceneLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_dialogue_view(mut self, view: Box<dyn DialogueView>) -> Self {
        self.dialogue_view = view;
        self
    }

    pub fn with_prompt_view(mut self, view: Box<dyn PromptView>) -> Self {
        self.prompt_view = view;
        self
    }

    pub fn with_quest_view(mut self, view: Box<dyn QuestView>) -> Self {
        self.quest_view = view;
        self
    }

    /// Audio for the quest-advance sound.
    pub fn with_quest_audio(mut self, audio: Box<dyn AudioSink>, sfx: SoundRef) -> Self {
        self.quest_audio = audio;
        self.quest_sfx = Some(sfx);
        self
    }

    pub fn with_interaction(mut self, settings: InteractionSettings) -> Self {
        self.interaction = settings;
        self
    }

    pub fn with_library(mut self, library: ContentLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn with_starting_quest(mut self, key: impl Into<String>, step: usize) -> Self {
        self.starting_quest = Some(StartingQuest {
            key: key.into(),
            step,
        });
        self
    }

    /// Build an empty scene. Objects are added afterwards.
    pub fn build(self) -> Scene {
        let mut quest = QuestTracker::new(self.quest_view, self.quest_audio);
        if let Some(sfx) = self.quest_sfx {
            quest = quest.with_advance_sfx(sfx);
        }

        let mut services = Services {
            input: InputGate::new(self.controls),
            playback: PlaybackCounter::new(),
            dialogue: DialogueSequencer::new(self.dialogue_view),
            quest,
            actor_camera: self.actor_camera,
            physics: self.physics,
            loader: self.loader,
            events: EventLog::new(),
        };

        if let Some(start) = &self.starting_quest {
            match self.library.quest(&start.key) {
                Some(data) => services
                    .quest
                    .start_quest(data.clone(), start.step, &mut services.events),
                None => tracing::warn!(key = %start.key, "starting quest not found in content library"),
            }
        }

        Scene {
            services,
            router: InteractionRouter::new(self.interaction, self.prompt_view),
            registry: InteractionRegistry::new(),
            cinematics: Vec::new(),
            disabled_cinematics: HashSet::new(),
            examinables: Vec::new(),
            scene_triggers: Vec::new(),
            library: self.library,
        }
    }

    /// Build a scene with every object in `manifest`.
    ///
    /// Each cinematic needs an entry in `bindings` under its name.
    pub fn build_from_manifest(
        mut self,
        manifest: SceneManifest,
        mut bindings: HashMap<String, CinematicBindings>,
    ) -> Result<Scene, SceneError> {
        manifest.validate()?;

        self.interaction = manifest.interaction;
        self.library = manifest.content;
        if manifest.starting_quest.is_some() {
            self.starting_quest = manifest.starting_quest;
        }

        let mut scene = self.build();
        for settings in manifest.cinematics {
            let binding = bindings
                .remove(&settings.name)
                .ok_or_else(|| SceneError::MissingBindings(settings.name.clone()))?;
            scene.add_cinematic(settings, binding)?;
        }
        for settings in manifest.examinables {
            scene.add_examinable(settings)?;
        }
        for settings in manifest.scene_triggers {
            scene.add_scene_trigger(settings);
        }

        if !bindings.is_empty() {
            let unused: Vec<&String> = bindings.keys().collect();
            tracing::warn!(?unused, "cinematic bindings without a matching cinematic");
        }

        tracing::info!(
            cinematics = scene.cinematics.len(),
            examinables = scene.examinables.len(),
            triggers = scene.scene_triggers.len(),
            "scene built from manifest"
        );
        Ok(scene)
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Scene {
    services: Services,
    router: InteractionRouter,
    registry: InteractionRegistry,
    cinematics: Vec<CinematicPlayer>,
    disabled_cinematics: HashSet<CinematicId>,
    examinables: Vec<Examinable>,
    scene_triggers: Vec<SceneTrigger>,
    library: ContentLibrary,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    // ---- composition ----

    /// Add an enabled cinematic and register its interaction collider.
    pub fn add_cinematic(
        &mut self,
        settings: CinematicSettings,
        bindings: CinematicBindings,
    ) -> Result<CinematicId, SceneError> {
        let id = CinematicId::new();
        if let Some(collider) = settings.interaction_collider {
            self.ensure_collider_unclaimed(collider)?;
            self.registry
                .register_cinematic(collider, id, settings.label.clone())?;
        }
        self.cinematics
            .push(CinematicPlayer::new(id, settings, bindings, &self.library));
        Ok(id)
    }

    /// Add an enabled examinable and register its collider.
    pub fn add_examinable(&mut self, settings: ExaminableSettings) -> Result<ExaminableId, SceneError> {
        let id = ExaminableId::new();
        self.ensure_collider_unclaimed(settings.collider)?;
        let examinable = Examinable::new(id, settings, &self.library);
        self.registry.register_examinable(
            examinable.collider(),
            id,
            examinable.label().map(str::to_owned),
        )?;
        self.examinables.push(examinable);
        Ok(id)
    }

    /// A collider stays claimed by its cinematic or examinable while that
    /// owner is disabled.
    fn ensure_collider_unclaimed(&self, collider: ColliderId) -> Result<(), SceneError> {
        let claimed = self
            .cinematics
            .iter()
            .any(|c| c.interaction_collider() == Some(collider))
            || self.examinables.iter().any(|e| e.collider() == collider);
        if claimed {
            return Err(SceneError::ColliderAlreadyRegistered(collider));
        }
        Ok(())
    }

    pub fn add_scene_trigger(&mut self, settings: SceneTriggerSettings) -> TriggerId {
        let id = TriggerId::new();
        self.scene_triggers.push(SceneTrigger::new(id, settings));
        id
    }

    /// Enable or disable a cinematic's colliders and its crosshair entry.
    pub fn set_cinematic_enabled(&mut self, id: CinematicId, enabled: bool) -> Result<(), SceneError> {
        let cinematic = self
            .cinematics
            .iter()
            .find(|c| c.id() == id)
            .ok_or(SceneError::UnknownCinematic(id))?;

        if enabled {
            if !self.disabled_cinematics.contains(&id) {
                return Ok(());
            }
            if let Some(collider) = cinematic.interaction_collider() {
                self.registry
                    .register_cinematic(collider, id, cinematic.label())?;
            }
            self.disabled_cinematics.remove(&id);
            // A completed sequence keeps its colliders off.
            if !cinematic.is_completed() {
                for collider in [cinematic.interaction_collider(), cinematic.trigger_collider()]
                    .into_iter()
                    .flatten()
                {
                    self.services.physics.set_collider_enabled(collider, true);
                }
            }
        } else {
            if !self.disabled_cinematics.insert(id) {
                return Ok(());
            }
            self.registry.unregister_cinematic(id);
            for collider in [cinematic.interaction_collider(), cinematic.trigger_collider()]
                .into_iter()
                .flatten()
            {
                self.services.physics.set_collider_enabled(collider, false);
            }
        }
        tracing::debug!(cinematic = %id, enabled, "cinematic toggled");
        Ok(())
    }

    /// Add or remove an examinable from the crosshair registry.
    pub fn set_examinable_enabled(&mut self, id: ExaminableId, enabled: bool) -> Result<(), SceneError> {
        let examinable = self
            .examinables
            .iter()
            .find(|e| e.id() == id)
            .ok_or(SceneError::UnknownExaminable(id))?;

        if enabled {
            if !self.registry.is_examinable_registered(id) {
                self.registry.register_examinable(
                    examinable.collider(),
                    id,
                    examinable.label().map(str::to_owned),
                )?;
            }
        } else {
            self.registry.unregister_examinable(id);
        }
        tracing::debug!(examinable = %id, enabled, "examinable toggled");
        Ok(())
    }

    // ---- per frame ----

    /// Run one frame: route the crosshair, act on the route, then let every
    /// cinematic advance its timers and poll its animation.
    pub fn tick(&mut self, frame: &FrameInput) {
        let guards = RouteGuards {
            any_cinematic_playing: self.services.playback.any_playing(),
            dialogue_open: self.services.dialogue.is_open(),
            controls_enabled: self.services.input.is_enabled(),
        };

        let route = self.router.route(
            frame,
            guards,
            self.services.physics.as_ref(),
            &self.registry,
        );

        match route {
            Route::Dialogue { advance: true } => {
                self.advance_dialogue();
            }
            Route::Cinematic { id, confirmed: true } => {
                if let Err(err) = self.play_cinematic_from_interaction(id) {
                    tracing::warn!(%err, "routed to a missing cinematic");
                }
            }
            Route::Examinable { id, confirmed: true } => {
                if let Err(err) = self.examine(id) {
                    tracing::warn!(%err, "routed to a missing examinable");
                }
            }
            _ => {}
        }

        for cinematic in self.cinematics.iter_mut() {
            cinematic.tick(frame.dt, &mut self.services);
        }
    }

    pub fn play_cinematic_from_interaction(&mut self, id: CinematicId) -> Result<PlayOutcome, SceneError> {
        let cinematic = Self::find_cinematic(&mut self.cinematics, id)?;
        Ok(cinematic.play_from_interaction(&mut self.services))
    }

    pub fn play_cinematic_from_trigger(&mut self, id: CinematicId) -> Result<PlayOutcome, SceneError> {
        let cinematic = Self::find_cinematic(&mut self.cinematics, id)?;
        Ok(cinematic.play_from_trigger(&mut self.services))
    }

    pub fn examine(&mut self, id: ExaminableId) -> Result<ExamineOutcome, SceneError> {
        let examinable = self
            .examinables
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(SceneError::UnknownExaminable(id))?;
        Ok(examinable.examine(&mut self.services))
    }

    /// Forward an animation event raised by a cinematic's animation host.
    pub fn dispatch_animation_event(
        &mut self,
        id: CinematicId,
        event: AnimationEvent,
    ) -> Result<bool, SceneError> {
        let cinematic = Self::find_cinematic(&mut self.cinematics, id)?;
        Ok(cinematic.handle_event(event, &mut self.services))
    }

    /// Something entered a trigger volume.
    pub fn on_trigger_enter(&mut self, collider: ColliderId, is_player: bool) {
        if !is_player {
            tracing::trace!(%collider, "non-player entered trigger");
            return;
        }

        for cinematic in self.cinematics.iter_mut() {
            if cinematic.trigger_collider() == Some(collider)
                && !self.disabled_cinematics.contains(&cinematic.id())
            {
                cinematic.play_from_trigger(&mut self.services);
            }
        }

        for trigger in self.scene_triggers.iter_mut() {
            if trigger.collider() == collider {
                trigger.on_enter(is_player, &mut self.services);
            }
        }
    }

    // ---- dialogue ----

    /// Open `script` directly, outside of an examinable.
    pub fn start_dialogue(
        &mut self,
        script: &DialogueScript,
        lock_input: bool,
        on_complete: Option<DialogueCallback>,
    ) -> bool {
        let services = &mut self.services;
        services.dialogue.start(
            script,
            lock_input,
            on_complete,
            &mut services.input,
            &mut services.events,
        )
    }

    /// Open a dialogue from the content library by key.
    pub fn start_library_dialogue(&mut self, key: &str, lock_input: bool) -> bool {
        let Some(script) = self.library.dialogue(key) else {
            tracing::warn!(key, "dialogue not found in content library");
            return false;
        };
        let services = &mut self.services;
        services.dialogue.start(
            script,
            lock_input,
            None,
            &mut services.input,
            &mut services.events,
        )
    }

    /// Advance the open dialogue, running its completion when it ends.
    ///
    /// Returns true when the dialogue moved (next line or finished).
    pub fn advance_dialogue(&mut self) -> bool {
        let services = &mut self.services;
        let step = services.dialogue.advance(
            &mut services.input,
            &services.playback,
            &mut services.events,
        );

        match step {
            DialogueStep::Ignored => false,
            DialogueStep::Showing(_) => true,
            DialogueStep::Finished(on_complete) => {
                if let Some(on_complete) = on_complete {
                    let mut done = Completion {
                        quest: &mut self.services.quest,
                        examinables: &mut self.examinables,
                        events: &mut self.services.events,
                    };
                    on_complete(&mut done);
                }
                true
            }
        }
    }

    pub fn force_close_dialogue(&mut self) {
        let services = &mut self.services;
        services
            .dialogue
            .force_close(&mut services.input, &mut services.events);
    }

    // ---- queries ----

    pub fn any_cinematic_playing(&self) -> bool {
        self.services.playback.any_playing()
    }

    pub fn controls_enabled(&self) -> bool {
        self.services.input.is_enabled()
    }

    pub fn dialogue(&self) -> &DialogueSequencer {
        &self.services.dialogue
    }

    pub fn quest(&self) -> &QuestTracker {
        &self.services.quest
    }

    /// Quest operations for host scripts.
    pub fn quest_mut(&mut self) -> (&mut QuestTracker, &mut EventLog) {
        (&mut self.services.quest, &mut self.services.events)
    }

    pub fn playback(&self) -> &PlaybackCounter {
        &self.services.playback
    }

    pub fn cinematic(&self, id: CinematicId) -> Option<&CinematicPlayer> {
        self.cinematics.iter().find(|c| c.id() == id)
    }

    pub fn cinematic_by_name(&self, name: &str) -> Option<&CinematicPlayer> {
        self.cinematics.iter().find(|c| c.name() == name)
    }

    pub fn examinable(&self, id: ExaminableId) -> Option<&Examinable> {
        self.examinables.iter().find(|e| e.id() == id)
    }

    pub fn examinable_by_name(&self, name: &str) -> Option<&Examinable> {
        self.examinables.iter().find(|e| e.name() == name)
    }

    pub fn scene_trigger(&self, id: TriggerId) -> Option<&SceneTrigger> {
        self.scene_triggers.iter().find(|t| t.id() == id)
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    // ---- events ----

    pub fn subscribe(&mut self, callback: EventCallback) {
        self.services.events.subscribe(callback);
    }

    pub fn pending_events(&self) -> &[SceneEvent] {
        self.services.events.pending()
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.services.events.drain()
    }

    fn find_cinematic(
        cinematics: &mut [CinematicPlayer],
        id: CinematicId,
    ) -> Result<&mut CinematicPlayer, SceneError> {
        cinematics
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(SceneError::UnknownCinematic(id))
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("services", &self.services)
            .field("router", &self.router)
            .field("registry", &self.registry)
            .field("cinematics", &self.cinematics)
            .field("examinables", &self.examinables)
            .field("scene_triggers", &self.scene_triggers)
            .finish_non_exhaustive()
    }
}
