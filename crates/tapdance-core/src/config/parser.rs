// Tapdance Config Parser - TOML with Serde
// Parses dance keys, hold intercepts and timing from TOML files

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::combo_parser::{parse_combo_string, parse_step, ComboParseError};
use crate::gesture::GestureCategory;
use crate::intercept::HoldInterceptSpec;
use crate::mapping::{ActionStep, GestureActions, OverloadedKeySpec};
use crate::transform::EngineConfig;
use crate::Key;

/// Accepted range for `timing.decision_window_ms`
pub const DECISION_WINDOW_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=5000;

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid combo string '{input}': {source}")]
    InvalidCombo {
        input: String,
        source: ComboParseError,
    },

    #[error("Unknown gesture category: {0}")]
    UnknownCategory(String),

    #[error("Duplicate dance trigger: {0}")]
    DuplicateTrigger(String),

    #[error("Duplicate hold intercept: {0}")]
    DuplicateIntercept(String),

    #[error("Timeout value out of range: {0}")]
    TimeoutOutOfRange(String),
}

/// Main configuration structure (root TOML table)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub timing: Option<TimingConfig>,

    /// Dance-enabled keys
    #[serde(default)]
    pub dance: Vec<DanceTomlEntry>,

    /// Alternate-hold entries
    #[serde(default)]
    pub hold_intercept: Vec<HoldInterceptTomlEntry>,
}

/// Timing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Decision window (milliseconds)
    pub decision_window_ms: Option<u64>,
}

/// One `[[dance]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DanceTomlEntry {
    pub name: String,
    /// Key the keymap emits for this position
    pub trigger: String,
    /// Base key of the standard action table
    pub base: String,
    /// Start from the standard table (default) or from nothing
    #[serde(default)]
    pub standard: Option<bool>,
    /// Per-category replacements, keyed by SCREAMING_SNAKE category name
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideTomlEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideTomlEntry {
    #[serde(default)]
    pub press: Vec<String>,
    #[serde(default)]
    pub release: Vec<String>,
}

/// One `[[hold_intercept]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoldInterceptTomlEntry {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub layer: Option<u8>,
    pub substitute: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Decision window (milliseconds)
    pub decision_window_ms: Option<u64>,
    pub dances: Vec<DanceEntry>,
    pub intercepts: Vec<HoldInterceptSpec>,
}

/// Dance entry for internal use
#[derive(Debug, Clone)]
pub struct DanceEntry {
    pub name: String,
    pub trigger: Key,
    pub base: Key,
    pub standard: bool,
    pub overrides: Vec<(GestureCategory, GestureActions)>,
}

impl DanceEntry {
    /// Build the runtime spec: standard (or empty) table plus overrides
    pub fn to_spec(&self) -> OverloadedKeySpec {
        let mut spec = if self.standard {
            OverloadedKeySpec::standard(&self.name, self.trigger, self.base)
        } else {
            OverloadedKeySpec::empty(&self.name, self.trigger, self.base)
        };
        for (category, actions) in &self.overrides {
            spec.set_action(*category, actions.clone());
        }
        spec
    }
}

impl Config {
    /// Parse a TOML configuration file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        toml_config.to_config()
    }

    /// Built-in preset
    pub fn preset() -> Result<Self, ConfigError> {
        Self::from_toml(default_config_content())
    }

    /// Default config path (~/.config/tapdance/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tapdance").join("config.toml"))
    }

    /// Load from the default location, falling back to the preset
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("loading config from {}", path.display());
                return Self::from_toml_path(path);
            }
        }
        Self::preset()
    }

    /// Dance triggers that a hold intercept also claims.
    ///
    /// The intercept runs first, so a held press of such a key never starts a gesture.
    pub fn intercepted_triggers(&self) -> Vec<Key> {
        self.dances
            .iter()
            .map(|d| d.trigger)
            .filter(|trigger| self.intercepts.iter().any(|spec| spec.key == *trigger))
            .collect()
    }

    /// Convert to EngineConfig for use in GestureEngine
    pub fn to_engine_config(&self) -> EngineConfig {
        log::debug!(
            "to_engine_config called with {} dances, {} intercepts",
            self.dances.len(),
            self.intercepts.len()
        );
        EngineConfig {
            dances: self.dances.iter().map(DanceEntry::to_spec).collect(),
            intercepts: self.intercepts.clone(),
            decision_window_ms: self.decision_window_ms,
        }
    }
}

impl ConfigToml {
    /// Convert parsed TOML to internal Config structure
    fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(window) = self.timing.as_ref().and_then(|t| t.decision_window_ms) {
            if !DECISION_WINDOW_RANGE_MS.contains(&window) {
                return Err(ConfigError::TimeoutOutOfRange(format!(
                    "decision_window_ms must be 100-5000ms, got {}",
                    window
                )));
            }
            config.decision_window_ms = Some(window);
        }

        let mut triggers = HashSet::new();
        for entry in &self.dance {
            let trigger = parse_key(&entry.trigger)?;
            if !triggers.insert(trigger) {
                return Err(ConfigError::DuplicateTrigger(format!(
                    "{} (dance '{}')",
                    trigger, entry.name
                )));
            }

            let mut overrides = Vec::with_capacity(entry.overrides.len());
            for (category_name, steps) in &entry.overrides {
                let category = GestureCategory::from_str(category_name.trim())
                    .map_err(|_| ConfigError::UnknownCategory(category_name.clone()))?;
                let actions = GestureActions::new(parse_steps(&steps.press)?, parse_steps(&steps.release)?);

                let leftover = actions.leftover_keys();
                if !leftover.is_empty() {
                    log::warn!(
                        "dance '{}' {}: release steps leave {:?} held",
                        entry.name,
                        category,
                        leftover.iter().map(|k| k.name()).collect::<Vec<_>>()
                    );
                }
                overrides.push((category, actions));
            }

            config.dances.push(DanceEntry {
                name: entry.name.clone(),
                trigger,
                base: parse_key(&entry.base)?,
                standard: entry.standard.unwrap_or(true),
                overrides,
            });
        }

        let mut intercepts = HashSet::new();
        for entry in &self.hold_intercept {
            let key = parse_key(&entry.key)?;
            if !intercepts.insert((key, entry.layer)) {
                return Err(ConfigError::DuplicateIntercept(format!(
                    "{} on layer {} ('{}')",
                    key,
                    entry.layer.map_or_else(|| "*".to_string(), |l| l.to_string()),
                    entry.name
                )));
            }
            let substitute = parse_combo_string(&entry.substitute).map_err(|source| ConfigError::InvalidCombo {
                input: entry.substitute.clone(),
                source,
            })?;

            let mut spec = HoldInterceptSpec::new(&entry.name, key, substitute);
            spec.layer = entry.layer;
            config.intercepts.push(spec);
        }

        for trigger in config.intercepted_triggers() {
            log::warn!("{} is both a dance trigger and a hold intercept; held presses skip the dance", trigger);
        }

        Ok(config)
    }
}

/// Parse a key name into a Key
fn parse_key(name: &str) -> Result<Key, ConfigError> {
    let trimmed = name.trim();
    crate::key::key_from_name(trimmed).ok_or_else(|| ConfigError::InvalidKey(trimmed.to_string()))
}

fn parse_steps(steps: &[String]) -> Result<Vec<ActionStep>, ConfigError> {
    steps
        .iter()
        .map(|s| {
            parse_step(s).map_err(|source| ConfigError::InvalidCombo {
                input: s.clone(),
                source,
            })
        })
        .collect()
}

/// Get default config file content
pub fn default_config_content() -> &'static str {
    r#"# Tapdance Config
# Place this file at: ~/.config/tapdance/config.toml

[timing]
# How long a gesture stays open for more presses (100-5000)
decision_window_ms = 200

# Numbers layer: tap/double/triple tap types the digit, hold sends Alt+digit,
# double hold sends Shift+Alt+digit, triple hold taps Shift+Alt+digit then
# holds Alt+digit.
[[dance]]
name = "DWM_1"
trigger = "F13"
base = "1"

[[dance]]
name = "DWM_2"
trigger = "F14"
base = "2"

[[dance]]
name = "DWM_3"
trigger = "F15"
base = "3"

[[dance]]
name = "DWM_4"
trigger = "F16"
base = "4"

[[dance]]
name = "DWM_5"
trigger = "F17"
base = "5"

[[dance]]
name = "DWM_6"
trigger = "F18"
base = "6"

[[dance]]
name = "DWM_7"
trigger = "F19"
base = "7"

[[dance]]
name = "DWM_8"
trigger = "F20"
base = "8"

[[dance]]
name = "DWM_9"
trigger = "F21"
base = "9"

[[dance]]
name = "DWM_0"
trigger = "F22"
base = "0"

# Alpha layer: holding X, C or V sends cut, copy or paste
[[hold_intercept]]
name = "cut"
key = "X"
layer = 0
substitute = "Ctrl-X"

[[hold_intercept]]
name = "copy"
key = "C"
layer = 0
substitute = "Ctrl-C"

[[hold_intercept]]
name = "paste"
key = "V"
layer = 0
substitute = "Ctrl-V"
"#
}
