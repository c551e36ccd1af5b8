// Tapdance Pressed Key State
// HashSet-based O(1) lookup of keys currently held on output

use crate::Key;
use std::collections::HashSet;

/// Tracks keys held down on the output side
#[derive(Debug, Clone, Default)]
pub struct PressedKeyState {
    pressed: HashSet<Key>,
}

impl PressedKeyState {
    /// Create a new empty pressed key state
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key to the pressed state. Returns false if it was already held.
    pub fn add(&mut self, key: Key) -> bool {
        self.pressed.insert(key)
    }

    /// Remove a key from the pressed state. Returns false if it was not held.
    pub fn remove(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    /// Check if a key is currently pressed
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Get all pressed keys, sorted by code
    pub fn get_all(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.pressed.iter().copied().collect();
        keys.sort();
        keys
    }

    /// Clear all pressed keys
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Get the number of pressed keys
    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    /// Check if the state is empty
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_add_remove() {
        let mut state = PressedKeyState::new();
        let key = Key::from(30);

        assert!(!state.is_pressed(key));
        assert!(state.add(key));
        assert!(state.is_pressed(key));
        assert!(state.remove(key));
        assert!(!state.is_pressed(key));
    }

    #[test]
    fn test_state_duplicate_add() {
        let mut state = PressedKeyState::new();
        let key = Key::from(30);

        assert!(state.add(key));
        assert!(!state.add(key));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_state_remove_nonexistent() {
        let mut state = PressedKeyState::new();
        assert!(!state.remove(Key::from(30)));
        assert!(state.is_empty());
    }

    #[test]
    fn test_state_get_all_sorted() {
        let mut state = PressedKeyState::new();
        state.add(Key::from(48));
        state.add(Key::from(30));
        assert_eq!(state.get_all(), vec![Key::from(30), Key::from(48)]);
        state.clear();
        assert!(state.is_empty());
    }
}
