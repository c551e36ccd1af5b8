// Tapdance Config - Combo String Parser
// Parses combo strings like "Shift-Alt-1" and step strings like "down:Alt-1"

use thiserror::Error;

use crate::mapping::ActionStep;
use crate::{Combo, Modifier};

/// Errors that can occur during combo or step parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboParseError {
    #[error("combo string cannot be empty")]
    EmptyInput,

    #[error("unknown key name: '{0}'")]
    UnknownKey(String),

    #[error("unknown modifier: '{0}'")]
    UnknownModifier(String),

    #[error("combo string cannot end with hyphen")]
    TrailingHyphen,

    #[error("step '{0}' must be tap:<combo>, down:<combo> or up:<combo>")]
    UnknownStep(String),
}

/// Parse a combo string like "Ctrl-Shift-A" into a [`Combo`]
///
/// The last hyphen-separated part is the key; every part before it is a
/// modifier alias. Repeated modifiers collapse.
///
/// # Examples
/// ```
/// use tapdance_core::config::parse_combo_string;
/// use tapdance_core::{Key, Modifier};
/// let combo = parse_combo_string("Alt-1").unwrap();
/// assert_eq!(combo.modifiers(), &[Modifier::Alt]);
/// assert_eq!(combo.key(), Key::from(2)); // KEY_1
/// ```
pub fn parse_combo_string(exp: &str) -> Result<Combo, ComboParseError> {
    let trimmed = exp.trim();
    if trimmed.is_empty() {
        return Err(ComboParseError::EmptyInput);
    }
    if trimmed.ends_with('-') {
        return Err(ComboParseError::TrailingHyphen);
    }

    let (modifier_part, key_str) = match trimmed.rsplit_once('-') {
        Some((mods, key)) => (Some(mods), key),
        None => (None, trimmed),
    };

    let key = crate::key::key_from_name(key_str)
        .ok_or_else(|| ComboParseError::UnknownKey(key_str.to_string()))?;

    let modifiers = modifier_part
        .into_iter()
        .flat_map(|mods| mods.split('-'))
        .map(|alias| {
            Modifier::from_alias(alias).ok_or_else(|| ComboParseError::UnknownModifier(alias.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Combo::new(modifiers, key))
}

/// Parse a step string: `tap:<combo>`, `down:<combo>` or `up:<combo>`
pub fn parse_step(exp: &str) -> Result<ActionStep, ComboParseError> {
    let (kind, combo) = exp
        .trim()
        .split_once(':')
        .ok_or_else(|| ComboParseError::UnknownStep(exp.to_string()))?;

    let combo = parse_combo_string(combo)?;
    match kind.trim().to_ascii_lowercase().as_str() {
        "tap" => Ok(ActionStep::Tap(combo)),
        "down" => Ok(ActionStep::Down(combo)),
        "up" => Ok(ActionStep::Up(combo)),
        _ => Err(ComboParseError::UnknownStep(exp.to_string())),
    }
}
