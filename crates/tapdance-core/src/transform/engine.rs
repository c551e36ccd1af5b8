// Tapdance Gesture Engine
// Dispatch glue: hold-intercept filter -> per-key accumulator -> classifier -> action table
//
// Features:
// - Hold-intercept substitution ahead of any other processing
// - Decision window per gesture with timeout and interruption
// - One active (unreleased) category per key, undone on release
// - Poll-driven deadlines, no threads or blocking

use std::collections::HashSet;

use crate::event::{DecisionTimers, KeyEvent, Millis};
use crate::gesture::{classify, GestureCategory, GestureRecord};
use crate::intercept::{HoldInterceptFilter, HoldInterceptSpec, InterceptOutcome};
use crate::mapping::{ActiveGestures, DanceTable, OverloadedKeySpec};
use crate::output::KeySink;
use crate::Key;

/// Default decision window (QMK's tapping term)
pub const DEFAULT_DECISION_WINDOW_MS: Millis = 200;

/// Configuration for the gesture engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Dance-enabled keys
    pub dances: Vec<OverloadedKeySpec>,
    /// Alternate-hold entries
    pub intercepts: Vec<HoldInterceptSpec>,
    /// Decision window (milliseconds)
    pub decision_window_ms: Option<Millis>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dances: vec![],
            intercepts: vec![],
            decision_window_ms: Some(DEFAULT_DECISION_WINDOW_MS),
        }
    }
}

/// What happened to an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Handled here; the caller must not forward it
    Consumed,
    /// Not ours; the caller's normal key processing should handle it
    Passthrough,
}

/// A gesture whose decision window is still open
#[derive(Debug, Clone, Copy)]
struct PendingGesture {
    key: Key,
    record: GestureRecord,
    started_at: Millis,
}

/// Single-threaded tap-dance and hold-intercept processor.
///
/// Feed every matrix event to [`process_event`](Self::process_event) in
/// arrival order and call [`tick`](Self::tick) from the idle loop (at the
/// latest one millisecond past [`next_deadline`](Self::next_deadline)) so
/// held gestures resolve without further input.
#[derive(Debug)]
pub struct GestureEngine {
    table: DanceTable,
    filter: HoldInterceptFilter,
    active: ActiveGestures,
    pending: Option<PendingGesture>,
    timers: DecisionTimers,
    window: Millis,
    /// Keys whose held press the filter consumed; their release is swallowed too
    intercepted: HashSet<Key>,
    now: Millis,
}

impl GestureEngine {
    /// Create a new engine with given configuration
    pub fn new(config: EngineConfig) -> Self {
        let window = config.decision_window_ms.unwrap_or(DEFAULT_DECISION_WINDOW_MS);
        Self {
            table: DanceTable::from_specs(config.dances),
            filter: HoldInterceptFilter::new(config.intercepts),
            active: ActiveGestures::new(),
            pending: None,
            timers: DecisionTimers::new(),
            window,
            intercepted: HashSet::new(),
            now: 0,
        }
    }

    /// Add a dance-enabled key
    pub fn add_dance(&mut self, spec: OverloadedKeySpec) {
        self.table.add(spec);
    }

    /// Add an alternate-hold entry
    pub fn add_intercept(&mut self, spec: HoldInterceptSpec) {
        self.filter.add(spec);
    }

    pub fn table(&self) -> &DanceTable {
        &self.table
    }

    pub fn filter(&self) -> &HoldInterceptFilter {
        &self.filter
    }

    pub fn active(&self) -> &ActiveGestures {
        &self.active
    }

    pub fn decision_window(&self) -> Millis {
        self.window
    }

    /// Latest timestamp seen
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Category the key resolved to and has not yet released
    pub fn active_category(&self, key: Key) -> Option<GestureCategory> {
        self.active.get(key).map(|s| s.category)
    }

    /// Key whose decision window is open, if any
    pub fn pending_key(&self) -> Option<Key> {
        self.pending.map(|p| p.key)
    }

    /// Check if a decision window is open
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Last instant of the earliest open window; `tick` fires it once the
    /// clock moves past this
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Process a single key event
    ///
    /// Expired windows fire first so output order follows timestamps even
    /// when the idle loop polled late.
    pub fn process_event<S: KeySink + ?Sized>(&mut self, event: &KeyEvent, sink: &mut S) -> EventOutcome {
        self.tick(event.timestamp, sink);
        log::trace!("{} {} @{} layer={}", event.action, event.key, event.timestamp, event.layer);

        // A different key going down closes the open window immediately
        if event.is_press() {
            if let Some(pending) = self.pending.as_mut() {
                if pending.key != event.key {
                    pending.record.interrupt();
                    self.resolve_pending(sink);
                }
            }
        }

        if self.filter.intercept(event, sink) == InterceptOutcome::Consumed {
            self.intercepted.insert(event.key);
            return EventOutcome::Consumed;
        }
        if !event.is_press() && self.intercepted.remove(&event.key) {
            return EventOutcome::Consumed;
        }

        if !self.table.is_trigger(event.key) {
            return EventOutcome::Passthrough;
        }

        if event.is_press() {
            self.dance_press(event);
        } else {
            self.dance_release(event.key, sink);
        }
        EventOutcome::Consumed
    }

    /// Fire every decision window whose deadline is strictly before `now`.
    ///
    /// Returns the number of gestures resolved.
    pub fn tick<S: KeySink + ?Sized>(&mut self, now: Millis, sink: &mut S) -> usize {
        self.now = self.now.max(now);
        let mut resolved = 0;
        for key in self.timers.expire(now) {
            if self.pending_key() == Some(key) {
                self.resolve_pending(sink);
                resolved += 1;
            }
        }
        resolved
    }

    /// Resolve the open window now, as if its timeout had elapsed
    pub fn flush<S: KeySink + ?Sized>(&mut self, sink: &mut S) -> Option<GestureCategory> {
        self.resolve_pending(sink)
    }

    /// Drop the open window and release every active gesture
    pub fn clear<S: KeySink + ?Sized>(&mut self, sink: &mut S) {
        if let Some(pending) = self.pending.take() {
            log::debug!("dropping open window for {} ({:?})", pending.key, pending.record);
        }
        self.timers.clear();
        self.intercepted.clear();
        for key in self.active.keys() {
            self.table.on_released(&mut self.active, key, sink);
        }
    }

    fn dance_press(&mut self, event: &KeyEvent) {
        let key = event.key;
        let deadline = event.timestamp.saturating_add(self.window);

        if let Some(pending) = self.pending.as_mut().filter(|p| p.key == key) {
            pending.record.register_press();
            self.timers.schedule(key, deadline);
            log::trace!("{} repeat #{}", key, pending.record.repeat_count);
            return;
        }

        if let Some(prior) = self.active.get(key) {
            log::warn!(
                "press of {} rejected: {} has not been released yet",
                key,
                prior.category
            );
            return;
        }

        self.pending = Some(PendingGesture {
            key,
            record: GestureRecord::begin(),
            started_at: event.timestamp,
        });
        self.timers.schedule(key, deadline);
    }

    fn dance_release<S: KeySink + ?Sized>(&mut self, key: Key, sink: &mut S) {
        if let Some(pending) = self.pending.as_mut().filter(|p| p.key == key) {
            pending.record.register_release();
            return;
        }

        match self.table.on_released(&mut self.active, key, sink) {
            Some(category) => log::debug!("{} released, undid {}", key, category),
            None => log::trace!("stray release of {}", key),
        }
    }

    fn resolve_pending<S: KeySink + ?Sized>(&mut self, sink: &mut S) -> Option<GestureCategory> {
        let pending = self.pending.take()?;
        self.timers.cancel(pending.key);

        let category = classify(&pending.record);
        log::debug!(
            "{} resolved as {} after {}ms ({:?})",
            pending.key,
            category,
            self.now.saturating_sub(pending.started_at),
            pending.record
        );

        let applied = self
            .table
            .on_classified(&mut self.active, category, pending.key, sink);
        // Already let go: the undo runs right away
        if applied && !pending.record.currently_held {
            self.table.on_released(&mut self.active, pending.key, sink);
        }
        Some(category)
    }
}
