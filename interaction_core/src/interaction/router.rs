//! Interaction router - the per-frame crosshair pass.
//!
//! The router decides what a frame's confirm press means and keeps the
//! interaction prompt in sync. It never acts on its own: it returns a
//! [`Route`] and the scene carries it out, so the router needs no access to
//! cinematics, examinables, or the dialogue sequencer.

use scene_rules::{CinematicId, ExaminableId, InputDevice, InteractionSettings};

use crate::host::{PhysicsWorld, Prompt, PromptView, Ray};
use crate::interaction::InteractionRegistry;

/// What the host reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// The confirm action went down this frame.
    pub confirm_pressed: bool,
    /// Device that produced the press, when known.
    pub confirm_device: Option<InputDevice>,
    pub view_ray: Ray,
}

impl FrameInput {
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn confirm(dt: f32) -> Self {
        Self {
            dt,
            confirm_pressed: true,
            ..Self::default()
        }
    }

    pub fn with_device(mut self, device: InputDevice) -> Self {
        self.confirm_device = Some(device);
        self
    }

    pub fn with_view_ray(mut self, ray: Ray) -> Self {
        self.view_ray = ray;
        self
    }
}

/// Scene state sampled once at the top of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuards {
    pub any_cinematic_playing: bool,
    pub dialogue_open: bool,
    pub controls_enabled: bool,
}

/// The router's verdict for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    BlockedByCinematic,
    /// A dialogue owns the confirm button.
    Dialogue { advance: bool },
    InputLocked,
    /// Nothing interactable under the crosshair.
    Nothing,
    Cinematic { id: CinematicId, confirmed: bool },
    Examinable { id: ExaminableId, confirmed: bool },
}

pub struct InteractionRouter {
    settings: InteractionSettings,
    last_device: InputDevice,
    prompt: Option<Prompt>,
    view: Box<dyn PromptView>,
}

impl InteractionRouter {
    pub fn new(settings: InteractionSettings, view: Box<dyn PromptView>) -> Self {
        Self {
            settings,
            last_device: InputDevice::default(),
            prompt: None,
            view,
        }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// The prompt currently on screen.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Device of the most recent confirm press that reached the raycast.
    pub fn last_device(&self) -> InputDevice {
        self.last_device
    }

    /// Run one frame of routing.
    ///
    /// Guards are checked in order: cinematic, dialogue, input. Only when all
    /// pass is the view ray cast, and a hit is matched against cinematics
    /// before examinables.
    pub fn route(
        &mut self,
        frame: &FrameInput,
        guards: RouteGuards,
        physics: &dyn PhysicsWorld,
        registry: &InteractionRegistry,
    ) -> Route {
        if guards.any_cinematic_playing {
            self.hide_prompt();
            return Route::BlockedByCinematic;
        }

        if guards.dialogue_open {
            self.hide_prompt();
            return Route::Dialogue {
                advance: frame.confirm_pressed,
            };
        }

        if !guards.controls_enabled {
            self.hide_prompt();
            return Route::InputLocked;
        }

        if frame.confirm_pressed {
            if let Some(device) = frame.confirm_device {
                self.last_device = device;
            }
        }

        let hit = physics.raycast(
            &frame.view_ray,
            self.settings.max_distance,
            self.settings.layer_mask,
        );
        let Some(collider) = hit else {
            self.hide_prompt();
            return Route::Nothing;
        };

        if let Some(registration) = registry.cinematic_for(collider) {
            let label = registration
                .label
                .clone()
                .unwrap_or_else(|| self.settings.fallback_label.clone());
            self.show_prompt(label);
            return Route::Cinematic {
                id: registration.target,
                confirmed: frame.confirm_pressed,
            };
        }

        if let Some(registration) = registry.examinable_for(collider) {
            let label = registration
                .label
                .clone()
                .unwrap_or_else(|| self.settings.fallback_label.clone());
            self.show_prompt(label);
            return Route::Examinable {
                id: registration.target,
                confirmed: frame.confirm_pressed,
            };
        }

        tracing::trace!(%collider, "raycast hit a collider with no target");
        self.hide_prompt();
        Route::Nothing
    }

    fn show_prompt(&mut self, label: String) {
        let prompt = Prompt {
            label,
            device: self.last_device,
        };
        if self.prompt.as_ref() == Some(&prompt) {
            return;
        }
        self.view.show(&prompt);
        self.prompt = Some(prompt);
    }

    fn hide_prompt(&mut self) {
        if self.prompt.take().is_some() {
            self.view.hide();
        }
    }
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self::new(InteractionSettings::default(), Box::new(()))
    }
}

impl std::fmt::Debug for InteractionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRouter")
            .field("settings", &self.settings)
            .field("last_device", &self.last_device)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}
