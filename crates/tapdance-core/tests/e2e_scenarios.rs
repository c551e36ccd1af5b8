// Tapdance End-to-End Test Scenarios
//
// These tests drive the gesture engine the way the firmware scan loop does:
// timestamped presses and releases plus idle ticks, with the output captured
// by an OutputRecorder.
//
// Run with: cargo test --test e2e_scenarios

use tapdance_core::{
    Combo, EngineConfig, EventOutcome, GestureCategory, GestureEngine, HoldInterceptSpec, Key, KeyEvent,
    OutputRecorder, OverloadedKeySpec,
};

// =========================================================================
// Test Helpers
// =========================================================================

const F13: Key = Key(183);
const F14: Key = Key(184);
const ONE: Key = Key(2);
const TWO: Key = Key(3);
const J: Key = Key(36);
const L: Key = Key(38);
const X: Key = Key(45);

const DOWN_1: &str = "down KEY_1";
const UP_1: &str = "up KEY_1";
const DOWN_ALT: &str = "down LEFT_ALT";
const UP_ALT: &str = "up LEFT_ALT";
const DOWN_SHIFT: &str = "down LEFT_SHIFT";
const UP_SHIFT: &str = "up LEFT_SHIFT";

/// Two dance keys on the numbers layer and an intercept on L
fn create_engine() -> GestureEngine {
    GestureEngine::new(EngineConfig {
        dances: vec![
            OverloadedKeySpec::standard("DWM_1", F13, ONE),
            OverloadedKeySpec::standard("DWM_2", F14, TWO),
        ],
        intercepts: vec![HoldInterceptSpec::new("cut", L, Combo::ctrl(X))],
        decision_window_ms: Some(200),
    })
}

/// Feed a sequence of events, returning the outcome of each
fn feed(engine: &mut GestureEngine, out: &mut OutputRecorder, events: &[KeyEvent]) -> Vec<EventOutcome> {
    events.iter().map(|ev| engine.process_event(ev, out)).collect()
}

fn press(key: Key, at: u64) -> KeyEvent {
    KeyEvent::press(key, at)
}

fn release(key: Key, at: u64) -> KeyEvent {
    KeyEvent::release(key, at)
}

// =========================================================================
// Single key gestures
// =========================================================================

#[test]
fn test_single_tap() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 80)]);
    assert!(out.events().is_empty(), "nothing before the window closes");

    engine.tick(200, &mut out);
    assert!(out.events().is_empty());

    assert_eq!(engine.tick(201, &mut out), 1);
    assert_eq!(out.render(), vec![DOWN_1, UP_1]);
    assert!(engine.active().is_empty());
}

#[test]
fn test_single_hold() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    engine.tick(201, &mut out);
    assert_eq!(out.render(), vec![DOWN_ALT, DOWN_1]);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::SingleHold));

    out.take_events();
    engine.process_event(&release(F13, 1_500), &mut out);
    assert_eq!(out.render(), vec![UP_1, UP_ALT]);
    assert_eq!(out.held_count(), 0);
}

#[test]
fn test_double_tap() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(
        &mut engine,
        &mut out,
        &[press(F13, 0), release(F13, 50), press(F13, 120), release(F13, 170)],
    );
    engine.tick(321, &mut out);
    assert_eq!(out.render(), vec![DOWN_1, UP_1, DOWN_1, UP_1]);
}

#[test]
fn test_repeat_press_at_window_edge_still_counts() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 50)]);
    assert_eq!(engine.next_deadline(), Some(200));

    // 200ms after the first press is still inside the window
    feed(&mut engine, &mut out, &[press(F13, 200), release(F13, 230)]);
    assert!(out.events().is_empty());

    assert_eq!(engine.flush(&mut out), Some(GestureCategory::DoubleTap));
    assert_eq!(out.render(), vec![DOWN_1, UP_1, DOWN_1, UP_1]);
}

#[test]
fn test_second_press_held_at_timeout() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 50), press(F13, 120)]);
    engine.tick(321, &mut out);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::DoubleHold));
}

#[test]
fn test_double_hold() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 50), press(F13, 100)]);
    engine.tick(301, &mut out);
    assert_eq!(out.render(), vec![DOWN_SHIFT, DOWN_ALT, DOWN_1]);

    out.take_events();
    engine.process_event(&release(F13, 900), &mut out);
    assert_eq!(out.render(), vec![UP_1, UP_ALT, UP_SHIFT]);
}

#[test]
fn test_triple_tap() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(
        &mut engine,
        &mut out,
        &[
            press(F13, 0),
            release(F13, 40),
            press(F13, 100),
            release(F13, 140),
            press(F13, 200),
            release(F13, 240),
        ],
    );
    engine.tick(401, &mut out);
    assert_eq!(out.render(), vec![DOWN_1, UP_1, DOWN_1, UP_1, DOWN_1, UP_1]);
}

#[test]
fn test_triple_hold() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(
        &mut engine,
        &mut out,
        &[press(F13, 0), release(F13, 40), press(F13, 100), release(F13, 140), press(F13, 200)],
    );
    engine.tick(401, &mut out);
    assert_eq!(
        out.render(),
        vec![DOWN_SHIFT, DOWN_ALT, DOWN_1, UP_1, UP_ALT, UP_SHIFT, DOWN_ALT, DOWN_1]
    );

    out.take_events();
    engine.process_event(&release(F13, 800), &mut out);
    assert_eq!(out.render(), vec![UP_1, UP_ALT]);
    assert_eq!(out.held_count(), 0);
}

#[test]
fn test_four_taps_is_unknown() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    for i in 0..4 {
        let t = i * 60;
        feed(&mut engine, &mut out, &[press(F13, t), release(F13, t + 20)]);
    }
    assert_eq!(engine.flush(&mut out), Some(GestureCategory::Unknown));
    assert!(out.events().is_empty());
    assert!(engine.active().is_empty());
}

// =========================================================================
// Interruption
// =========================================================================

#[test]
fn test_interrupt_fires_at_interrupting_press() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    let outcome = engine.process_event(&press(J, 30), &mut out);

    // Resolved before J is handed back, well ahead of the timeout
    assert_eq!(outcome, EventOutcome::Passthrough);
    assert_eq!(out.render(), vec![DOWN_1]);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::SingleTap));
    assert_eq!(engine.next_deadline(), None);

    out.take_events();
    engine.process_event(&release(F13, 90), &mut out);
    assert_eq!(out.render(), vec![UP_1]);
}

#[test]
fn test_double_single_tap() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(
        &mut engine,
        &mut out,
        &[press(F13, 0), release(F13, 30), press(F13, 60), press(J, 70)],
    );
    assert_eq!(engine.active_category(F13), Some(GestureCategory::DoubleSingleTap));
    assert_eq!(out.render(), vec![DOWN_1, UP_1, DOWN_1]);

    engine.process_event(&release(F13, 100), &mut out);
    assert_eq!(out.held_count(), 0);
}

#[test]
fn test_interrupt_after_release_resolves_tap() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 30), press(J, 60)]);
    assert_eq!(out.render(), vec![DOWN_1, UP_1]);
    assert!(engine.active().is_empty());
}

#[test]
fn test_other_dance_key_interrupts() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 20), press(F14, 40)]);
    assert_eq!(out.render(), vec![DOWN_1, UP_1]);
    assert_eq!(engine.pending_key(), Some(F14));

    engine.process_event(&release(F14, 60), &mut out);
    engine.tick(241, &mut out);
    assert_eq!(out.render(), vec![DOWN_1, UP_1, "down KEY_2", "up KEY_2"]);
}

#[test]
fn test_no_reclassification_after_resolution() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    engine.tick(201, &mut out);
    // An interruption after the fact does not turn the hold into a tap
    engine.process_event(&press(J, 250), &mut out);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::SingleHold));
    assert_eq!(out.render(), vec![DOWN_ALT, DOWN_1]);
}

// =========================================================================
// Hold intercept
// =========================================================================

#[test]
fn test_hold_intercept_consumes() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    let outcome = engine.process_event(&press(L, 0).as_hold(), &mut out);
    assert_eq!(outcome, EventOutcome::Consumed);
    assert_eq!(out.render(), vec!["down LEFT_CTRL", "down X", "up X", "up LEFT_CTRL"]);

    assert_eq!(engine.process_event(&release(L, 400), &mut out), EventOutcome::Consumed);
    assert!(!engine.is_pending());
    assert_eq!(out.held_count(), 0);
}

#[test]
fn test_hold_intercept_tap_passes_through() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    let outcomes = feed(&mut engine, &mut out, &[press(L, 0), release(L, 50)]);
    assert_eq!(outcomes, vec![EventOutcome::Passthrough, EventOutcome::Passthrough]);
    assert!(out.events().is_empty());
}

#[test]
fn test_hold_intercept_interrupts_pending_dance() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 30), press(L, 60).as_hold()]);
    assert_eq!(
        out.render(),
        vec![DOWN_1, UP_1, "down LEFT_CTRL", "down X", "up X", "up LEFT_CTRL"]
    );
}

// =========================================================================
// Bookkeeping
// =========================================================================

#[test]
fn test_concurrent_press_rejected() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    engine.tick(201, &mut out);
    let before = out.events().len();

    assert_eq!(engine.process_event(&press(F13, 300), &mut out), EventOutcome::Consumed);
    engine.tick(1_000, &mut out);
    assert_eq!(out.events().len(), before);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::SingleHold));
}

#[test]
fn test_independent_keys() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    engine.tick(201, &mut out);
    engine.process_event(&press(F14, 300), &mut out);
    engine.tick(501, &mut out);

    assert_eq!(engine.active().len(), 2);
    engine.process_event(&release(F13, 600), &mut out);
    assert_eq!(engine.active_category(F14), Some(GestureCategory::SingleHold));
    engine.process_event(&release(F14, 700), &mut out);
    assert_eq!(out.held_count(), 0);
}

#[test]
fn test_stray_release_is_noop() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    assert_eq!(engine.process_event(&release(F13, 0), &mut out), EventOutcome::Consumed);
    assert!(out.events().is_empty());
}

#[test]
fn test_late_event_fires_expired_window_first() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    engine.process_event(&press(F13, 0), &mut out);
    // No tick ran; the next event arrives long after the deadline
    engine.process_event(&press(J, 900), &mut out);
    assert_eq!(engine.active_category(F13), Some(GestureCategory::SingleHold));
}

#[test]
fn test_clear_balances_output() {
    let mut engine = create_engine();
    let mut out = OutputRecorder::new();

    feed(&mut engine, &mut out, &[press(F13, 0), release(F13, 20), press(F13, 40)]);
    engine.tick(241, &mut out);
    engine.process_event(&press(F14, 300), &mut out);
    assert!(out.held_count() > 0);

    engine.clear(&mut out);
    assert_eq!(out.held_count(), 0);
    assert!(!engine.is_pending());
    assert!(engine.active().is_empty());
}
