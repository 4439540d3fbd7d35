//! Crosshair interaction: target registry, per-frame router, examinables.

mod examinable;
mod registry;
mod router;

pub use examinable::*;
pub use registry::*;
pub use router::*;
