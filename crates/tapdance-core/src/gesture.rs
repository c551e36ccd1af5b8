// Tapdance Gesture Classification
// Folds a run of same-key events into a record and classifies it

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Outcome of one decision window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureCategory {
    None,
    Unknown,
    SingleTap,
    SingleHold,
    DoubleTap,
    DoubleHold,
    /// Two independent taps, e.g. a doubled letter typed inside a word
    DoubleSingleTap,
    TripleTap,
    TripleHold,
}

impl GestureCategory {
    /// True for categories decided while the key was still down
    pub fn is_hold(self) -> bool {
        matches!(
            self,
            GestureCategory::SingleHold | GestureCategory::DoubleHold | GestureCategory::TripleHold
        )
    }
}

/// What the dispatch loop has seen of the current gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureRecord {
    /// Number of presses folded into this gesture
    pub repeat_count: u8,
    /// Another key was pressed before the window closed
    pub interrupted: bool,
    /// The key is down right now
    pub currently_held: bool,
}

impl GestureRecord {
    /// Record for a gesture that has just seen its first press
    pub fn begin() -> Self {
        Self {
            repeat_count: 1,
            interrupted: false,
            currently_held: true,
        }
    }

    /// Fold another press of the same key
    pub fn register_press(&mut self) {
        self.repeat_count = self.repeat_count.saturating_add(1);
        self.currently_held = true;
    }

    /// Fold a release of the same key
    pub fn register_release(&mut self) {
        self.currently_held = false;
    }

    /// Mark that a different key was pressed
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }
}

/// Classify an accumulated gesture. Pure and total.
pub fn classify(record: &GestureRecord) -> GestureCategory {
    match record.repeat_count {
        1 => {
            if record.interrupted || !record.currently_held {
                GestureCategory::SingleTap
            } else {
                GestureCategory::SingleHold
            }
        }
        2 => {
            if record.interrupted {
                GestureCategory::DoubleSingleTap
            } else if record.currently_held {
                GestureCategory::DoubleHold
            } else {
                GestureCategory::DoubleTap
            }
        }
        3 => {
            if record.interrupted || !record.currently_held {
                GestureCategory::TripleTap
            } else {
                GestureCategory::TripleHold
            }
        }
        _ => GestureCategory::Unknown,
    }
}
