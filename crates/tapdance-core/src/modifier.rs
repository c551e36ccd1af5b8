// Tapdance Modifier Set
// Keyboard modifiers used to build combos (Ctrl, Shift, Alt, Meta)

use std::fmt;

use strum_macros::EnumIter;

use crate::Key;

/// A keyboard modifier. Generic variants resolve to the left-hand key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
    RCtrl,
    RShift,
    RAlt,
    RMeta,
}

impl Modifier {
    /// The key pressed on output for this modifier
    pub fn key(self) -> Key {
        match self {
            Modifier::Ctrl => Key::from(29),
            Modifier::Shift => Key::from(42),
            Modifier::Alt => Key::from(56),
            Modifier::Meta => Key::from(125),
            Modifier::RCtrl => Key::from(97),
            Modifier::RShift => Key::from(54),
            Modifier::RAlt => Key::from(100),
            Modifier::RMeta => Key::from(126),
        }
    }

    /// Aliases accepted in combo strings. The first is the display form.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Modifier::Ctrl => &["Ctrl", "C", "LCtrl", "LC", "Control"],
            Modifier::Shift => &["Shift", "S", "LShift", "LS"],
            Modifier::Alt => &["Alt", "A", "LAlt", "LA", "Opt", "Option"],
            Modifier::Meta => &["Meta", "Super", "Win", "Cmd", "Command", "LMeta", "LGui", "Gui"],
            Modifier::RCtrl => &["RCtrl", "RC"],
            Modifier::RShift => &["RShift", "RS"],
            Modifier::RAlt => &["RAlt", "RA", "ROpt", "AltGr"],
            Modifier::RMeta => &["RMeta", "RSuper", "RWin", "RCmd", "RGui"],
        }
    }

    /// Get the first alias (string representation)
    pub fn primary_alias(self) -> &'static str {
        self.aliases()[0]
    }

    /// Get modifier by alias (case-insensitive)
    pub fn from_alias(alias: &str) -> Option<Modifier> {
        use strum::IntoEnumIterator;

        let wanted = alias.trim();
        Modifier::iter().find(|m| m.aliases().iter().any(|a| a.eq_ignore_ascii_case(wanted)))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary_alias())
    }
}
