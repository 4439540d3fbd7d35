//! Scene composition errors.
//!
//! Only composition-time calls return these. Per-frame entry points log and
//! no-op instead.

use scene_rules::{CinematicId, ColliderId, ConfigError, ExaminableId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("collider {0} is already registered to another interaction target")]
    ColliderAlreadyRegistered(ColliderId),

    #[error("unknown {0}")]
    UnknownCinematic(CinematicId),

    #[error("unknown {0}")]
    UnknownExaminable(ExaminableId),

    #[error("no host bindings supplied for cinematic '{0}'")]
    MissingBindings(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
