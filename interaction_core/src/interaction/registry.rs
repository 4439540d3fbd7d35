//! Collider -> interaction target lookup.

use scene_rules::{CinematicId, ColliderId, ExaminableId};

use crate::error::SceneError;

/// One enabled target reachable through the crosshair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration<T> {
    pub collider: ColliderId,
    pub target: T,
    /// Prompt label. `None` lets the router fall back to its default.
    pub label: Option<String>,
}

/// Every crosshair target currently enabled in the scene.
///
/// Cinematics and examinables are kept in separate lists, each in
/// registration order. A collider belongs to at most one target across both
/// lists.
#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    cinematics: Vec<Registration<CinematicId>>,
    examinables: Vec<Registration<ExaminableId>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_cinematic(
        &mut self,
        collider: ColliderId,
        id: CinematicId,
        label: impl Into<String>,
    ) -> Result<(), SceneError> {
        self.ensure_free(collider)?;
        self.cinematics.push(Registration {
            collider,
            target: id,
            label: Some(label.into()),
        });
        tracing::debug!(%collider, cinematic = %id, "cinematic registered");
        Ok(())
    }

    pub fn register_examinable(
        &mut self,
        collider: ColliderId,
        id: ExaminableId,
        label: Option<String>,
    ) -> Result<(), SceneError> {
        self.ensure_free(collider)?;
        self.examinables.push(Registration {
            collider,
            target: id,
            label,
        });
        tracing::debug!(%collider, examinable = %id, "examinable registered");
        Ok(())
    }

    /// Returns true when the cinematic was registered.
    pub fn unregister_cinematic(&mut self, id: CinematicId) -> bool {
        let before = self.cinematics.len();
        self.cinematics.retain(|r| r.target != id);
        before != self.cinematics.len()
    }

    pub fn unregister_examinable(&mut self, id: ExaminableId) -> bool {
        let before = self.examinables.len();
        self.examinables.retain(|r| r.target != id);
        before != self.examinables.len()
    }

    pub fn cinematic_for(&self, collider: ColliderId) -> Option<&Registration<CinematicId>> {
        self.cinematics.iter().find(|r| r.collider == collider)
    }

    pub fn examinable_for(&self, collider: ColliderId) -> Option<&Registration<ExaminableId>> {
        self.examinables.iter().find(|r| r.collider == collider)
    }

    pub fn is_cinematic_registered(&self, id: CinematicId) -> bool {
        self.cinematics.iter().any(|r| r.target == id)
    }

    pub fn is_examinable_registered(&self, id: ExaminableId) -> bool {
        self.examinables.iter().any(|r| r.target == id)
    }

    pub fn cinematics(&self) -> impl Iterator<Item = &Registration<CinematicId>> {
        self.cinematics.iter()
    }

    pub fn examinables(&self) -> impl Iterator<Item = &Registration<ExaminableId>> {
        self.examinables.iter()
    }

    pub fn len(&self) -> usize {
        self.cinematics.len() + self.examinables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_free(&self, collider: ColliderId) -> Result<(), SceneError> {
        let taken = self.cinematics.iter().any(|r| r.collider == collider)
            || self.examinables.iter().any(|r| r.collider == collider);
        if taken {
            return Err(SceneError::ColliderAlreadyRegistered(collider));
        }
        Ok(())
    }
}
