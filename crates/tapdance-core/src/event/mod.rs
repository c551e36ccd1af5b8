// Tapdance Event Handling
// Inbound key events and decision-window deadlines

pub mod timer;

pub use timer::DecisionTimers;

use crate::{Action, Key};

/// Milliseconds on the controller's monotonic clock
pub type Millis = u64;

/// The matrix collaborator's own tap-vs-hold verdict for a press.
///
/// Only consulted for keys registered with the hold-intercept filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TapHold {
    /// Released (or still undecided) within the collaborator's tapping term
    #[default]
    Tap,
    /// Held past the collaborator's tapping term
    Hold,
}

/// One press or release from the matrix scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key from the keymap table
    pub key: Key,
    pub action: Action,
    pub timestamp: Millis,
    /// Layer active when the event was produced
    pub layer: u8,
    pub tap_hold: TapHold,
}

impl KeyEvent {
    pub fn new(key: Key, action: Action, timestamp: Millis) -> Self {
        Self {
            key,
            action,
            timestamp,
            layer: 0,
            tap_hold: TapHold::Tap,
        }
    }

    pub fn press(key: Key, timestamp: Millis) -> Self {
        Self::new(key, Action::Press, timestamp)
    }

    pub fn release(key: Key, timestamp: Millis) -> Self {
        Self::new(key, Action::Release, timestamp)
    }

    /// Set the active layer
    pub fn on_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Mark the press as a hold per the collaborator's discriminant
    pub fn as_hold(mut self) -> Self {
        self.tap_hold = TapHold::Hold;
        self
    }

    pub fn is_press(&self) -> bool {
        self.action.is_pressed()
    }

    pub fn is_hold(&self) -> bool {
        self.tap_hold == TapHold::Hold
    }
}
