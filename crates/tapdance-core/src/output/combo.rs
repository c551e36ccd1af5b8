// Tapdance Combo Emission
// Ordering rules for sending a modified key as discrete key edges

use smallvec::SmallVec;

use super::KeySink;
use crate::{Combo, Key};

/// Key edges needed to press or release a combo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboActionSequence {
    /// Modifier keys in press order
    pub modifiers: SmallVec<[Key; 2]>,
    /// The main key of the combo
    pub main_key: Key,
}

impl ComboActionSequence {
    /// Compute the sequence for a combo
    pub fn for_combo(combo: &Combo) -> Self {
        Self {
            modifiers: combo.modifiers().iter().map(|m| m.key()).collect(),
            main_key: combo.key(),
        }
    }

    /// Keys in the order they go down: modifiers first, then the main key
    pub fn press_order(&self) -> impl Iterator<Item = Key> + '_ {
        self.modifiers.iter().copied().chain(std::iter::once(self.main_key))
    }

    /// Keys in the order they come up: main key first, then modifiers in reverse
    pub fn release_order(&self) -> impl Iterator<Item = Key> + '_ {
        std::iter::once(self.main_key).chain(self.modifiers.iter().rev().copied())
    }
}

/// Hold a combo down
pub fn register<S: KeySink + ?Sized>(sink: &mut S, combo: &Combo) {
    let seq = ComboActionSequence::for_combo(combo);
    for key in seq.press_order() {
        sink.key_down(key);
    }
}

/// Release a combo previously held with [`register`]
pub fn unregister<S: KeySink + ?Sized>(sink: &mut S, combo: &Combo) {
    let seq = ComboActionSequence::for_combo(combo);
    for key in seq.release_order() {
        sink.key_up(key);
    }
}

/// Press and immediately release a combo
pub fn tap<S: KeySink + ?Sized>(sink: &mut S, combo: &Combo) {
    register(sink, combo);
    unregister(sink, combo);
}
