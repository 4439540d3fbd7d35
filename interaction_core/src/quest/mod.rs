//! Quest tracker - a linear cursor over the active quest's steps.

use scene_rules::{QuestData, SoundRef};

use crate::events::{EventLog, SceneEvent};
use crate::host::{AudioSink, QuestView};

pub struct QuestTracker {
    quest: Option<QuestData>,
    step: usize,
    advance_sfx: Option<SoundRef>,
    audio: Box<dyn AudioSink>,
    view: Box<dyn QuestView>,
}

impl QuestTracker {
    pub fn new(view: Box<dyn QuestView>, audio: Box<dyn AudioSink>) -> Self {
        Self {
            quest: None,
            step: 0,
            advance_sfx: None,
            audio,
            view,
        }
    }

    /// Sound played whenever the step actually changes.
    pub fn with_advance_sfx(mut self, sound: SoundRef) -> Self {
        self.advance_sfx = Some(sound);
        self
    }

    pub fn quest(&self) -> Option<&QuestData> {
        self.quest.as_ref()
    }

    /// Current step index, `None` without an active quest.
    pub fn step_index(&self) -> Option<usize> {
        self.quest.as_ref().map(|_| self.step)
    }

    pub fn step_text(&self) -> Option<&str> {
        self.quest.as_ref().and_then(|q| q.step(self.step))
    }

    /// Make `quest` active at `start_index` (clamped).
    ///
    /// A quest without steps clears the tracker instead.
    pub fn start_quest(&mut self, quest: QuestData, start_index: usize, events: &mut EventLog) {
        let Some(step) = quest.clamp_step(start_index) else {
            tracing::warn!(quest = %quest.name, "quest has no steps, clearing tracker");
            self.clear();
            return;
        };

        tracing::info!(quest = %quest.name, step, "quest started");
        events.emit(SceneEvent::QuestStarted {
            quest: quest.name.clone(),
            step,
        });
        self.quest = Some(quest);
        self.step = step;
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.quest = None;
        self.step = 0;
        self.refresh();
    }

    /// Move one step forward, stopping at the last step.
    ///
    /// Returns true when the step changed.
    pub fn advance_step(&mut self, events: &mut EventLog) -> bool {
        let next = self.step.saturating_add(1);
        self.move_to(next, events)
    }

    /// Jump to `index` (clamped). The only way to move backwards.
    pub fn set_step(&mut self, index: usize, events: &mut EventLog) -> bool {
        self.move_to(index, events)
    }

    fn move_to(&mut self, index: usize, events: &mut EventLog) -> bool {
        let Some(quest) = &self.quest else {
            tracing::debug!("no active quest");
            return false;
        };
        let Some(target) = quest.clamp_step(index) else {
            return false;
        };

        let changed = target != self.step;
        self.step = target;

        if changed {
            tracing::info!(quest = %quest.name, step = target, "quest step changed");
            events.emit(SceneEvent::QuestStepChanged {
                quest: quest.name.clone(),
                step: target,
            });
            if let Some(sound) = &self.advance_sfx {
                self.audio.play_one_shot(sound);
            }
        }

        self.refresh();
        changed
    }

    fn refresh(&mut self) {
        match &self.quest {
            Some(quest) => match quest.step(self.step) {
                Some(text) => self.view.show_step(&quest.name, text),
                None => self.view.clear(),
            },
            None => self.view.clear(),
        }
    }
}

impl Default for QuestTracker {
    fn default() -> Self {
        Self::new(Box::new(()), Box::new(()))
    }
}

impl std::fmt::Debug for QuestTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestTracker")
            .field("quest", &self.quest.as_ref().map(|q| q.name.as_str()))
            .field("step", &self.step_index())
            .finish()
    }
}
