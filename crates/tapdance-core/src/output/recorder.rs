// Tapdance Output Recorder
// In-memory KeySink used by the replay harness and tests

use std::fmt;

use super::{KeySink, PressedKeyState};
use crate::{Action, Key};

/// One emitted key edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    pub key: Key,
    pub action: Action,
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Press => write!(f, "down {}", self.key),
            Action::Release => write!(f, "up {}", self.key),
        }
    }
}

/// Records every edge it receives and tracks what is still held
#[derive(Debug, Clone, Default)]
pub struct OutputRecorder {
    events: Vec<OutputEvent>,
    held: PressedKeyState,
}

impl OutputRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All edges received so far
    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// Drain the recorded edges, keeping the held-key state
    pub fn take_events(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Edges rendered as `down KEY` / `up KEY`
    pub fn render(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }

    /// Keys currently held on output
    pub fn held(&self) -> &PressedKeyState {
        &self.held
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

impl KeySink for OutputRecorder {
    fn send(&mut self, key: Key, action: Action) {
        let changed = match action {
            Action::Press => self.held.add(key),
            Action::Release => self.held.remove(key),
        };
        if !changed {
            log::warn!("unbalanced output: {} {} (held={:?})", action, key, self.held.get_all());
        }
        self.events.push(OutputEvent { key, action });
    }
}
