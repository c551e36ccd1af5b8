// Tapdance Combo Type
// A key plus the modifiers held around it (QMK-style "modified keycode")

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::modifier::Modifier;
use crate::Key;

/// A key with an ordered list of modifiers.
///
/// Order is kept for emission (modifiers go down in order, come up in
/// reverse) but ignored for equality and hashing.
#[derive(Debug, Clone)]
pub struct Combo {
    modifiers: SmallVec<[Modifier; 2]>,
    key: Key,
}

impl Combo {
    /// Create a new Combo from modifiers and a key
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        let mut list: SmallVec<[Modifier; 2]> = SmallVec::new();
        for m in modifiers {
            if !list.contains(&m) {
                list.push(m);
            }
        }
        Self {
            modifiers: list,
            key,
        }
    }

    /// A bare key with no modifiers
    pub fn plain(key: Key) -> Self {
        Self {
            modifiers: SmallVec::new(),
            key,
        }
    }

    /// Create a Combo from a single modifier and key
    pub fn from_single(modifier: Modifier, key: Key) -> Self {
        Self::new([modifier], key)
    }

    /// Left Alt + key
    pub fn alt(key: Key) -> Self {
        Self::from_single(Modifier::Alt, key)
    }

    /// Left Shift + left Alt + key
    pub fn shift_alt(key: Key) -> Self {
        Self::new([Modifier::Shift, Modifier::Alt], key)
    }

    /// Left Ctrl + key
    pub fn ctrl(key: Key) -> Self {
        Self::from_single(Modifier::Ctrl, key)
    }

    /// Get the modifiers for this combo
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Get the key for this combo
    pub fn key(&self) -> Key {
        self.key
    }

    fn sorted_modifiers(&self) -> SmallVec<[Modifier; 2]> {
        let mut sorted = self.modifiers.clone();
        sorted.sort();
        sorted
    }
}

impl From<Key> for Combo {
    fn from(key: Key) -> Self {
        Combo::plain(key)
    }
}

impl PartialEq for Combo {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.sorted_modifiers() == other.sorted_modifiers()
    }
}

impl Eq for Combo {}

impl Hash for Combo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_modifiers().hash(state);
        self.key.hash(state);
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}-", m)?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_equality_order_independent() {
        let a = Combo::new([Modifier::Shift, Modifier::Alt], Key::from(2));
        let b = Combo::new([Modifier::Alt, Modifier::Shift], Key::from(2));
        assert_eq!(a, b);
        assert_ne!(a, Combo::alt(Key::from(2)));
    }

    #[test]
    fn test_combo_display() {
        assert_eq!(Combo::shift_alt(Key::from(2)).to_string(), "Shift-Alt-KEY_1");
        assert_eq!(Combo::plain(Key::from(45)).to_string(), "X");
    }

    #[test]
    fn test_combo_dedups_modifiers() {
        let combo = Combo::new([Modifier::Ctrl, Modifier::Ctrl], Key::from(45));
        assert_eq!(combo.modifiers(), &[Modifier::Ctrl]);
    }

    #[test]
    fn test_combo_hashable() {
        use std::collections::HashMap;
        let mut map: HashMap<Combo, &str> = HashMap::new();
        map.insert(Combo::new([Modifier::Alt, Modifier::Shift], Key::from(3)), "lsa");
        assert_eq!(map.get(&Combo::shift_alt(Key::from(3))), Some(&"lsa"));
    }
}
