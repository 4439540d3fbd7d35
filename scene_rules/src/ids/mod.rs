//! Identifiers for scene objects.
//!
//! Colliders are owned by the physics host; the remaining ids name objects the
//! interaction core owns. All of them are opaque UUIDs so they can be authored
//! in a manifest and compared by identity at runtime.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a collider reported by raycasts and trigger volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub Uuid);

impl ColliderId {
    /// Create a new random collider ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a collider ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ColliderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ColliderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a cinematic player in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CinematicId(pub Uuid);

impl CinematicId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CinematicId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CinematicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cinematic:{}", self.0)
    }
}

/// Identity of an examinable object in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExaminableId(pub Uuid);

impl ExaminableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExaminableId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExaminableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "examinable:{}", self.0)
    }
}

/// Identity of a scene-load trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trigger:{}", self.0)
    }
}
