//! # Interaction Core
//!
//! Decides, frame by frame, who owns the player's input and camera in a
//! first-person narrative scene: free exploration, an open dialogue, or a
//! running cinematic.
//!
//! ## Core Components
//!
//! - **input**: The gate that says whether the player may act
//! - **dialogue**: Single-session line sequencer with optional input lock
//! - **quest**: Linear step cursor for the active quest
//! - **cinematic**: Clip-sequencing state machine with per-channel one-shot gates
//! - **interaction**: Crosshair router, registry, and examinable objects
//! - **scene**: Composition root that owns all of the above and drives the frame
//! - **events**: Observer surface for hosts (HUD, audio, analytics)
//!
//! ## Frame Model
//!
//! - **Single-threaded**: every transition happens inside `Scene::tick` or a
//!   call the host makes between ticks
//! - **Polling**: a cinematic ends when its animation host stops reporting
//!   playback, checked once per tick
//! - **Never fatal**: per-frame entry points log and degrade instead of failing

pub mod cinematic;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod host;
pub mod input;
pub mod interaction;
pub mod quest;
pub mod scene;


pub use cinematic::*;
pub use dialogue::*;
pub use error::*;
pub use events::*;
pub use host::*;
pub use input::*;
pub use interaction::*;
pub use quest::*;
pub use scene::*;
