//! # Scene Rules
//!
//! Authored data for a Stagehand scene: identifiers, dialogue scripts, quests,
//! animation clip references, and the per-object settings that the interaction
//! core is built from. This crate holds no runtime state and makes no
//! decisions about who owns player input; that lives in `interaction_core`.

pub mod content;
pub mod ids;
pub mod mechanics;
pub mod settings;

pub use content::*;
pub use ids::*;
pub use mechanics::*;
pub use settings::*;
