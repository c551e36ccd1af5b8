// Tapdance Output Layer
// Synthetic key events toward the host-transmission collaborator

mod combo;
mod recorder;
mod state;

pub use combo::{register, tap, unregister, ComboActionSequence};
pub use recorder::{OutputEvent, OutputRecorder};
pub use state::PressedKeyState;

use crate::{Action, Key};

/// Receiver of synthetic key events.
///
/// Implemented by whatever turns logical keys into host reports. Calls are
/// made in emission order and never batched.
pub trait KeySink {
    /// Send one key edge to the host
    fn send(&mut self, key: Key, action: Action);

    /// Send a key-down
    fn key_down(&mut self, key: Key) {
        self.send(key, Action::Press);
    }

    /// Send a key-up
    fn key_up(&mut self, key: Key) {
        self.send(key, Action::Release);
    }
}

impl<S: KeySink + ?Sized> KeySink for &mut S {
    fn send(&mut self, key: Key, action: Action) {
        (**self).send(key, action);
    }
}
