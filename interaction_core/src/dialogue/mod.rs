//! Dialogue sequencer - walks one script at a time, line by line.
//!
//! At most one dialogue is open per scene. A session may lock player input
//! while it runs; only the session that took the lock gives it back.
//!
//! Two ways to close:
//! - **Natural end**: advancing past the last line hands the completion
//!   callback back to the caller, exactly once
//! - **Forced close**: used by cinematics and scene transitions; the callback
//!   is dropped so script-side continuation logic never runs

use scene_rules::{DialogueScript, Line};

use crate::cinematic::PlaybackCounter;
use crate::events::{EventLog, SceneEvent};
use crate::host::DialogueView;
use crate::input::InputGate;
use crate::scene::Completion;

/// Continuation run when a dialogue ends naturally.
pub type DialogueCallback = Box<dyn FnOnce(&mut Completion<'_>)>;

/// Result of an `advance` request.
pub enum DialogueStep {
    /// Nothing open, or a cinematic owns the frame.
    Ignored,
    /// The line at this index is now on screen.
    Showing(usize),
    /// The script ran out. Carries the completion callback, if any.
    Finished(Option<DialogueCallback>),
}

impl DialogueStep {
    pub fn is_finished(&self) -> bool {
        matches!(self, DialogueStep::Finished(_))
    }
}

impl std::fmt::Debug for DialogueStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueStep::Ignored => f.write_str("Ignored"),
            DialogueStep::Showing(index) => f.debug_tuple("Showing").field(index).finish(),
            DialogueStep::Finished(callback) => f
                .debug_tuple("Finished")
                .field(&callback.as_ref().map(|_| "callback"))
                .finish(),
        }
    }
}

struct ActiveDialogue {
    script: DialogueScript,
    cursor: usize,
    locks_input: bool,
    on_complete: Option<DialogueCallback>,
}

pub struct DialogueSequencer {
    active: Option<ActiveDialogue>,
    view: Box<dyn DialogueView>,
}

impl DialogueSequencer {
    pub fn new(view: Box<dyn DialogueView>) -> Self {
        Self { active: None, view }
    }

    /// True while a script is on screen.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.active.as_ref().map(|d| d.cursor)
    }

    pub fn speaker(&self) -> Option<&str> {
        self.active.as_ref().map(|d| d.script.speaker.as_str())
    }

    /// Whether the open session took the input lock.
    pub fn locks_input(&self) -> bool {
        self.active.as_ref().is_some_and(|d| d.locks_input)
    }

    pub fn current_line(&self) -> Option<Line<'_>> {
        self.active
            .as_ref()
            .and_then(|d| d.script.line(d.cursor))
    }

    /// Open `script` at its first line.
    ///
    /// Returns false (and changes nothing) for a script without lines. A
    /// dialogue that is already open is force-closed first.
    pub fn start(
        &mut self,
        script: &DialogueScript,
        lock_input: bool,
        on_complete: Option<DialogueCallback>,
        gate: &mut InputGate,
        events: &mut EventLog,
    ) -> bool {
        if script.is_empty() {
            tracing::warn!(speaker = %script.speaker, "dialogue script has no lines, not starting");
            return false;
        }

        if self.is_open() {
            tracing::debug!("replacing open dialogue");
            self.force_close(gate, events);
        }

        if lock_input {
            gate.disable();
        }

        self.active = Some(ActiveDialogue {
            script: script.clone(),
            cursor: 0,
            locks_input: lock_input,
            on_complete,
        });

        tracing::info!(speaker = %script.speaker, lines = script.len(), lock_input, "dialogue started");
        events.emit(SceneEvent::DialogueOpened {
            speaker: script.speaker.clone(),
        });
        self.render();
        true
    }

    /// Move to the next line, or finish the script.
    ///
    /// Ignored while closed and while any cinematic is playing.
    pub fn advance(
        &mut self,
        gate: &mut InputGate,
        playback: &PlaybackCounter,
        events: &mut EventLog,
    ) -> DialogueStep {
        if playback.any_playing() {
            tracing::debug!("dialogue advance blocked by cinematic");
            return DialogueStep::Ignored;
        }

        let Some(active) = self.active.as_mut() else {
            return DialogueStep::Ignored;
        };

        active.cursor += 1;
        if active.cursor >= active.script.len() {
            let on_complete = self.teardown(gate, events, false);
            return DialogueStep::Finished(on_complete);
        }

        let cursor = active.cursor;
        self.render();
        DialogueStep::Showing(cursor)
    }

    /// Close without running the completion callback. No-op when closed.
    pub fn force_close(&mut self, gate: &mut InputGate, events: &mut EventLog) {
        if !self.is_open() {
            return;
        }
        // Dropped, never invoked.
        let _ = self.teardown(gate, events, true);
    }

    fn teardown(
        &mut self,
        gate: &mut InputGate,
        events: &mut EventLog,
        forced: bool,
    ) -> Option<DialogueCallback> {
        let active = self.active.take()?;

        self.view.hide();
        if active.locks_input {
            gate.enable();
        }

        tracing::info!(speaker = %active.script.speaker, forced, "dialogue closed");
        events.emit(SceneEvent::DialogueClosed { forced });
        active.on_complete
    }

    fn render(&mut self) {
        if let Some(active) = &self.active {
            if let Some(line) = active.script.line(active.cursor) {
                self.view.show_line(line);
            }
        }
    }
}

impl Default for DialogueSequencer {
    fn default() -> Self {
        Self::new(Box::new(()))
    }
}

impl std::fmt::Debug for DialogueSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueSequencer")
            .field("open", &self.is_open())
            .field("cursor", &self.cursor())
            .field("locks_input", &self.locks_input())
            .finish()
    }
}
