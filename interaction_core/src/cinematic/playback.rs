//! Scene-wide count of running cinematics.

use crate::events::{EventLog, SceneEvent};

/// How many cinematics are between play and stop.
///
/// This is the only state cinematic players share. Observers hear about it
/// only when "any playing" flips, never on 1->2->1.
#[derive(Debug, Clone, Default)]
pub struct PlaybackCounter {
    active: u32,
}

impl PlaybackCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> u32 {
        self.active
    }

    pub fn any_playing(&self) -> bool {
        self.active > 0
    }

    /// Count one more running cinematic.
    pub fn begin(&mut self, events: &mut EventLog) {
        self.active = self.active.saturating_add(1);
        if self.active == 1 {
            events.emit(SceneEvent::PlaybackStateChanged { any_playing: true });
        }
    }

    /// Count one cinematic finished. A stop without a matching start is ignored.
    pub fn end(&mut self, events: &mut EventLog) {
        if self.active == 0 {
            tracing::warn!("cinematic stop without a matching start");
            return;
        }
        self.active -= 1;
        if self.active == 0 {
            events.emit(SceneEvent::PlaybackStateChanged { any_playing: false });
        }
    }
}
