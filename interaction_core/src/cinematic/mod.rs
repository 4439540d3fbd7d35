//! Cinematic player - plays a sequence of clips while owning the camera.
//!
//! The state machine works as follows:
//! 1. **Play**: a channel (interaction or trigger) asks to play; the request is
//!    dropped while playing, after the sequence completed, or when that
//!    channel's one-shot gate is spent
//! 2. **Take over**: input off, player camera off, cinematic camera on, clip
//!    at the current index handed to the animation host
//! 3. **Poll**: each tick checks whether the animation host still plays
//! 4. **Stop**: close any dialogue without its callback, apply the quest and
//!    sequence policies, hand camera and input back
//!
//! Animation events only act between 2 and 4.

mod playback;

pub use playback::*;

use scene_rules::{
    ActivationChannel, CinematicId, CinematicSettings, ClipRef, ColliderId, ContentLibrary,
    DialogueScript, ACTOR_CROSS_FADE_SECS,
};

use crate::events::SceneEvent;
use crate::host::{ActorAnimator, AnimationPlayer, AudioSink, Switchable};
use crate::scene::Services;

/// Host objects a cinematic drives directly.
pub struct CinematicBindings {
    pub animation: Box<dyn AnimationPlayer>,
    pub camera: Option<Box<dyn Switchable>>,
    /// Object shown only while the cinematic runs.
    pub prop: Option<Box<dyn Switchable>>,
    pub actor: Option<Box<dyn ActorAnimator>>,
    pub audio: Option<Box<dyn AudioSink>>,
}

impl CinematicBindings {
    pub fn new(animation: Box<dyn AnimationPlayer>) -> Self {
        Self {
            animation,
            camera: None,
            prop: None,
            actor: None,
            audio: None,
        }
    }

    pub fn with_camera(mut self, camera: Box<dyn Switchable>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_prop(mut self, prop: Box<dyn Switchable>) -> Self {
        self.prop = Some(prop);
        self
    }

    pub fn with_actor(mut self, actor: Box<dyn ActorAnimator>) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = Some(audio);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CinematicState {
    Idle,
    Playing,
    /// Every clip has been played once with auto-advance on. Terminal.
    Completed,
}

/// Why a play request did or did not start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    AlreadyPlaying,
    SequenceCompleted,
    ChannelConsumed,
}

/// Callbacks raised by the animation host while a clip runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// Play the sfx at this index.
    PlaySfx(usize),
    SetActorTrigger(String),
    CrossFadeActorState(String),
    /// Open the dialogue at this index, without locking input.
    TriggerDialogue(usize),
    /// Schedule the timed event at this index.
    TriggerTimedEvent(usize),
    /// Re-emit a named cue to scene observers.
    Signal(String),
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    index: usize,
    remaining: f32,
}

pub struct CinematicPlayer {
    id: CinematicId,
    settings: CinematicSettings,
    clips: Vec<ClipRef>,
    dialogues: Vec<Option<DialogueScript>>,

    state: CinematicState,
    current_clip_index: usize,
    /// Index the running (or last) session played.
    session_clip_index: usize,
    interaction_used_once: bool,
    trigger_used_once: bool,
    timers: Vec<PendingTimer>,

    bindings: CinematicBindings,
}

impl CinematicPlayer {
    /// Set up a cinematic in its scene-load state.
    ///
    /// The animation is stopped, camera and prop switched off. Without
    /// authored clips the list is taken from the animation host.
    pub fn new(
        id: CinematicId,
        settings: CinematicSettings,
        mut bindings: CinematicBindings,
        library: &ContentLibrary,
    ) -> Self {
        bindings.animation.stop();
        if let Some(camera) = bindings.camera.as_mut() {
            camera.set_active(false);
        }
        if let Some(prop) = bindings.prop.as_mut() {
            prop.set_active(false);
        }

        let clips = if settings.clips.is_empty() {
            let mut found: Vec<ClipRef> = Vec::new();
            for name in bindings.animation.clip_names() {
                let clip = ClipRef::new(name);
                if !found.contains(&clip) {
                    found.push(clip);
                }
            }
            found
        } else {
            settings.clips.clone()
        };

        let current_clip_index = match clips.len() {
            0 => 0,
            len => settings.start_clip_index.min(len - 1),
        };

        let dialogues = settings
            .dialogues
            .iter()
            .map(|key| {
                let script = library.dialogue(key).cloned();
                if script.is_none() {
                    tracing::warn!(cinematic = %id, key = %key, "dialogue not found in content library");
                }
                script
            })
            .collect();

        tracing::debug!(cinematic = %id, name = %settings.name, clips = clips.len(), "cinematic ready");

        Self {
            id,
            settings,
            clips,
            dialogues,
            state: CinematicState::Idle,
            current_clip_index,
            session_clip_index: current_clip_index,
            interaction_used_once: false,
            trigger_used_once: false,
            timers: Vec::new(),
            bindings,
        }
    }

    pub fn id(&self) -> CinematicId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn label(&self) -> &str {
        &self.settings.label
    }

    pub fn settings(&self) -> &CinematicSettings {
        &self.settings
    }

    pub fn state(&self) -> CinematicState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == CinematicState::Playing
    }

    pub fn is_completed(&self) -> bool {
        self.state == CinematicState::Completed
    }

    pub fn clips(&self) -> &[ClipRef] {
        &self.clips
    }

    pub fn current_clip_index(&self) -> usize {
        self.current_clip_index
    }

    pub fn interaction_collider(&self) -> Option<ColliderId> {
        self.settings.interaction_collider
    }

    pub fn trigger_collider(&self) -> Option<ColliderId> {
        self.settings.trigger_collider
    }

    /// Whether a "once" channel has been spent.
    pub fn channel_consumed(&self, channel: ActivationChannel) -> bool {
        match channel {
            ActivationChannel::Interaction => self.interaction_used_once,
            ActivationChannel::Trigger => self.trigger_used_once,
        }
    }

    pub fn play_from_interaction(&mut self, services: &mut Services) -> PlayOutcome {
        self.play(ActivationChannel::Interaction, services)
    }

    pub fn play_from_trigger(&mut self, services: &mut Services) -> PlayOutcome {
        self.play(ActivationChannel::Trigger, services)
    }

    fn play(&mut self, channel: ActivationChannel, services: &mut Services) -> PlayOutcome {
        match self.state {
            CinematicState::Playing => {
                tracing::debug!(cinematic = %self.id, "already playing");
                return PlayOutcome::AlreadyPlaying;
            }
            CinematicState::Completed => {
                tracing::debug!(cinematic = %self.id, "sequence completed");
                return PlayOutcome::SequenceCompleted;
            }
            CinematicState::Idle => {}
        }

        let (once, used) = match channel {
            ActivationChannel::Interaction => {
                (self.settings.interaction_once, &mut self.interaction_used_once)
            }
            ActivationChannel::Trigger => (self.settings.trigger_once, &mut self.trigger_used_once),
        };
        if once {
            if *used {
                tracing::debug!(cinematic = %self.id, channel = channel.label(), "channel already used");
                return PlayOutcome::ChannelConsumed;
            }
            // Spent for good, whatever happens to this session.
            *used = true;
        }

        self.state = CinematicState::Playing;
        self.session_clip_index = self.current_clip_index;

        services.playback.begin(&mut services.events);
        services.input.disable();
        services.actor_camera.set_active(false);
        if let Some(camera) = self.bindings.camera.as_mut() {
            camera.set_active(true);
        }
        if let Some(prop) = self.bindings.prop.as_mut() {
            prop.set_active(true);
        }

        let clip = self.current_clip_name().map(str::to_owned);
        tracing::info!(
            cinematic = %self.id,
            channel = channel.label(),
            clip = clip.as_deref().unwrap_or("<default>"),
            "cinematic started"
        );
        services.events.emit(SceneEvent::CinematicStarted {
            cinematic: self.id,
            clip: clip.clone(),
        });
        self.bindings.animation.play(clip.as_deref());

        if !self.bindings.animation.is_playing() {
            tracing::warn!(cinematic = %self.id, "animation did not start, stopping immediately");
            self.stop(services);
        }

        PlayOutcome::Started
    }

    /// Per-frame update: fire due timed events, then stop once the clip ended.
    pub fn tick(&mut self, dt: f32, services: &mut Services) {
        if !self.is_playing() {
            return;
        }

        self.advance_timers(dt, services);

        if !self.bindings.animation.is_playing() {
            self.stop(services);
        }
    }

    /// Handle an animation event. Suppressed outside a session.
    ///
    /// Returns true when the event had an effect.
    pub fn handle_event(&mut self, event: AnimationEvent, services: &mut Services) -> bool {
        if !self.is_playing() {
            tracing::debug!(cinematic = %self.id, ?event, "animation event outside session suppressed");
            return false;
        }

        match event {
            AnimationEvent::PlaySfx(index) => {
                let (Some(audio), Some(sound)) =
                    (self.bindings.audio.as_mut(), self.settings.sfx.get(index))
                else {
                    tracing::debug!(cinematic = %self.id, index, "no sfx to play");
                    return false;
                };
                audio.play_one_shot(sound);
                true
            }
            AnimationEvent::SetActorTrigger(name) => match self.bindings.actor.as_mut() {
                Some(actor) if !name.is_empty() => {
                    actor.set_trigger(&name);
                    true
                }
                _ => false,
            },
            AnimationEvent::CrossFadeActorState(state) => match self.bindings.actor.as_mut() {
                Some(actor) if !state.is_empty() => {
                    actor.cross_fade(&state, ACTOR_CROSS_FADE_SECS);
                    true
                }
                _ => false,
            },
            AnimationEvent::TriggerDialogue(index) => {
                let Some(script) = self.dialogues.get(index).and_then(Option::as_ref) else {
                    tracing::debug!(cinematic = %self.id, index, "no dialogue at index");
                    return false;
                };
                services.dialogue.start(
                    script,
                    false,
                    None,
                    &mut services.input,
                    &mut services.events,
                )
            }
            AnimationEvent::TriggerTimedEvent(index) => {
                let Some(timed) = self.settings.timed_events.get(index) else {
                    tracing::debug!(cinematic = %self.id, index, "no timed event at index");
                    return false;
                };
                if timed.delay_secs <= 0.0 {
                    self.fire_timed(index, services);
                } else {
                    self.timers.push(PendingTimer {
                        index,
                        remaining: timed.delay_secs,
                    });
                }
                true
            }
            AnimationEvent::Signal(name) => {
                services.events.emit(SceneEvent::CinematicSignal {
                    cinematic: self.id,
                    name,
                });
                true
            }
        }
    }

    fn current_clip_name(&self) -> Option<&str> {
        let last = self.clips.len().checked_sub(1)?;
        self.clips
            .get(self.current_clip_index.min(last))
            .map(|clip| clip.name.as_str())
    }

    fn advance_timers(&mut self, dt: f32, services: &mut Services) {
        if self.timers.is_empty() {
            return;
        }
        for timer in self.timers.iter_mut() {
            timer.remaining -= dt;
        }
        let (due, pending): (Vec<PendingTimer>, Vec<PendingTimer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.remaining <= 0.0);
        self.timers = pending;
        for timer in due {
            self.fire_timed(timer.index, services);
        }
    }

    fn fire_timed(&self, index: usize, services: &mut Services) {
        if let Some(timed) = self.settings.timed_events.get(index) {
            services.events.emit(SceneEvent::TimedEvent {
                cinematic: self.id,
                name: timed.name.clone(),
            });
        }
    }

    fn stop(&mut self, services: &mut Services) {
        let played = self.session_clip_index;
        tracing::info!(cinematic = %self.id, clip_index = played, "cinematic ended");
        services.events.emit(SceneEvent::CinematicEnded {
            cinematic: self.id,
            clip_index: played,
        });

        services
            .dialogue
            .force_close(&mut services.input, &mut services.events);

        if self
            .settings
            .quest
            .should_advance(!self.clips.is_empty(), played)
        {
            services.quest.advance_step(&mut services.events);
        }

        let completed = self.advance_sequence(services);

        if let Some(camera) = self.bindings.camera.as_mut() {
            camera.set_active(false);
        }
        if let Some(prop) = self.bindings.prop.as_mut() {
            prop.set_active(false);
        }
        services.actor_camera.set_active(true);
        services.input.enable();
        services.playback.end(&mut services.events);

        // Cues scheduled by this session die with it.
        self.timers.clear();
        self.state = if completed {
            CinematicState::Completed
        } else {
            CinematicState::Idle
        };
    }

    /// Returns true when the last clip has now been played.
    fn advance_sequence(&mut self, services: &mut Services) -> bool {
        if !self.settings.advance_on_each_play || self.clips.is_empty() {
            return false;
        }

        self.current_clip_index += 1;
        if self.current_clip_index < self.clips.len() {
            return false;
        }

        tracing::info!(cinematic = %self.id, "sequence completed, disabling colliders");
        let colliders = [
            self.settings.interaction_collider,
            self.settings.trigger_collider,
        ];
        for collider in colliders.into_iter().flatten() {
            services.physics.set_collider_enabled(collider, false);
        }
        true
    }
}

impl std::fmt::Debug for CinematicPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CinematicPlayer")
            .field("id", &self.id)
            .field("name", &self.settings.name)
            .field("state", &self.state)
            .field("current_clip_index", &self.current_clip_index)
            .field("clips", &self.clips.len())
            .finish_non_exhaustive()
    }
}
