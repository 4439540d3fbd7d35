//! Interaction mechanics: activation channels, input devices, collision layers.

use serde::{Deserialize, Serialize};

/// The two independent paths that can start a cinematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationChannel {
    /// The player looked at the object and pressed confirm.
    Interaction,
    /// The player walked into a proximity volume.
    Trigger,
}

impl ActivationChannel {
    pub fn label(&self) -> &'static str {
        match self {
            ActivationChannel::Interaction => "interaction",
            ActivationChannel::Trigger => "trigger",
        }
    }
}

/// Device family that produced the last confirm press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InputDevice {
    #[default]
    KeyboardMouse,
    Gamepad,
}

/// How a scene transition should be performed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoadMode {
    /// Swap scenes synchronously.
    Immediate,
    /// Stream the next scene in and activate it when ready.
    #[default]
    Background,
}

/// Bit mask of collision layers a raycast may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const EVERYTHING: LayerMask = LayerMask(u32::MAX);
    pub const NOTHING: LayerMask = LayerMask(0);

    /// Mask containing the single layer `layer` (0-31).
    pub fn layer(layer: u8) -> Self {
        LayerMask(1u32.checked_shl(u32::from(layer)).unwrap_or(0))
    }

    pub fn contains(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }

    pub fn with(self, layer: u8) -> Self {
        LayerMask(self.0 | Self::layer(layer).0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::EVERYTHING
    }
}
