//! Host collaborators.
//!
//! The core never talks to an engine directly. Everything it needs from the
//! outside world (animation playback, cameras, audio, physics queries, UI
//! widgets, scene loading) goes through the traits below. The unit type
//! implements the output-only traits as no-ops so a scene can be composed
//! without a HUD or audio.

use scene_rules::{ColliderId, InputDevice, LayerMask, Line, LoadMode, SoundRef};
use serde::{Deserialize, Serialize};

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The crosshair ray: camera position along camera forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::FORWARD)
    }
}

/// Animation component attached to a cinematic.
pub trait AnimationPlayer {
    /// Start a clip by name, or the component's default clip for `None`.
    fn play(&mut self, clip: Option<&str>);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Clips the component knows about, used when none are authored.
    fn clip_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The player's movement/look controller.
pub trait PlayerControls {
    fn set_controls_enabled(&mut self, enabled: bool);
}

/// Anything that is simply switched on or off: cameras, props.
pub trait Switchable {
    fn set_active(&mut self, active: bool);
}

/// Animator of the actor a cinematic drives through animation events.
pub trait ActorAnimator {
    fn set_trigger(&mut self, name: &str);

    fn cross_fade(&mut self, state: &str, blend_secs: f32);
}

pub trait AudioSink {
    fn play_one_shot(&mut self, sound: &SoundRef);
}

/// Fire-and-forget scene transitions.
///
/// Every transition the core starts calls `pause_audio` first and then
/// `load_scene`. Hosts resume audio themselves once the next scene is up.
pub trait SceneLoader {
    /// Silence all scene audio ahead of a load.
    fn pause_audio(&mut self) {}

    fn load_scene(&mut self, name: &str, mode: LoadMode);
}

/// Physics queries and collider switches.
pub trait PhysicsWorld {
    /// Cast `ray` up to `max_distance` against `mask`, trigger volumes
    /// included, and return the first collider hit.
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<ColliderId>;

    fn set_collider_enabled(&mut self, collider: ColliderId, enabled: bool);
}

/// The dialogue panel.
pub trait DialogueView {
    fn show_line(&mut self, line: Line<'_>);

    fn hide(&mut self);
}

/// Interaction prompt shown under the crosshair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub label: String,
    /// Device whose binding hint the HUD should display.
    pub device: InputDevice,
}

pub trait PromptView {
    fn show(&mut self, prompt: &Prompt);

    fn hide(&mut self);
}

/// Quest objective widget.
pub trait QuestView {
    fn show_step(&mut self, quest: &str, step: &str);

    fn clear(&mut self);
}

impl PlayerControls for () {
    fn set_controls_enabled(&mut self, _enabled: bool) {}
}

impl Switchable for () {
    fn set_active(&mut self, _active: bool) {}
}

impl AudioSink for () {
    fn play_one_shot(&mut self, _sound: &SoundRef) {}
}

impl SceneLoader for () {
    fn load_scene(&mut self, _name: &str, _mode: LoadMode) {}
}

impl DialogueView for () {
    fn show_line(&mut self, _line: Line<'_>) {}

    fn hide(&mut self) {}
}

impl PromptView for () {
    fn show(&mut self, _prompt: &Prompt) {}

    fn hide(&mut self) {}
}

impl QuestView for () {
    fn show_step(&mut self, _quest: &str, _step: &str) {}

    fn clear(&mut self) {}
}

/// Physics host with nothing in it: every raycast misses.
impl PhysicsWorld for () {
    fn raycast(&self, _ray: &Ray, _max_distance: f32, _mask: LayerMask) -> Option<ColliderId> {
        None
    }

    fn set_collider_enabled(&mut self, _collider: ColliderId, _enabled: bool) {}
}
