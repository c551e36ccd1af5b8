// Tapdance Config API
// Combo/step string parsing and the TOML config file

pub mod combo_parser;

#[cfg(feature = "config-file")]
pub mod parser;

pub use combo_parser::{parse_combo_string, parse_step, ComboParseError};

#[cfg(feature = "config-file")]
pub use parser::{default_config_content, Config, ConfigError, DanceEntry, DECISION_WINDOW_RANGE_MS};
