// Tapdance Transform Module
// Gesture engine tying the intercept filter, classifier and action table together

pub mod engine;

pub use engine::{EngineConfig, EventOutcome, GestureEngine, DEFAULT_DECISION_WINDOW_MS};
