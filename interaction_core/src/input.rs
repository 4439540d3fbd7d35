//! Input gate - whether the player may currently act.

use crate::host::PlayerControls;

/// Scene-wide "can the player act" flag, mirrored onto the player controller.
///
/// Dialogue and cinematics are the only writers. The controller is told only
/// when the flag actually changes.
pub struct InputGate {
    enabled: bool,
    controls: Box<dyn PlayerControls>,
}

impl InputGate {
    /// Create an enabled gate in front of `controls`.
    pub fn new(controls: Box<dyn PlayerControls>) -> Self {
        Self {
            enabled: true,
            controls,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.set_enabled(true);
    }

    pub fn disable(&mut self) {
        self.set_enabled(false);
    }

    /// Returns true when the flag changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.controls.set_controls_enabled(enabled);
        tracing::debug!(enabled, "player controls toggled");
        true
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new(Box::new(()))
    }
}

impl std::fmt::Debug for InputGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputGate")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
