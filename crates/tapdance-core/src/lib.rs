// Tapdance Core Library
// Tap-dance gesture classification, per-gesture actions and hold intercepts

pub mod action;
pub mod combo;
pub mod config;
pub mod event;
pub mod gesture;
pub mod intercept;
pub mod key;
pub mod mapping;
pub mod modifier;
pub mod output;
pub mod transform;

pub use action::Action;
pub use combo::Combo;
pub use config::{parse_combo_string, parse_step, ComboParseError};
pub use event::{DecisionTimers, KeyEvent, Millis, TapHold};
pub use gesture::{classify, GestureCategory, GestureRecord};
pub use intercept::{HoldInterceptFilter, HoldInterceptSpec, InterceptOutcome};
pub use key::Key;
pub use mapping::{ActionStep, ActiveGestureState, ActiveGestures, DanceTable, GestureActions, OverloadedKeySpec};
pub use modifier::Modifier;
pub use output::{ComboActionSequence, KeySink, OutputEvent, OutputRecorder, PressedKeyState};
pub use transform::{EngineConfig, EventOutcome, GestureEngine, DEFAULT_DECISION_WINDOW_MS};

#[cfg(feature = "config-file")]
pub use config::{default_config_content, Config, ConfigError};
