// Tapdance Mapping Structures
// OverloadedKeySpec, DanceTable, ActiveGestures

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::gesture::GestureCategory;
use crate::output::{self, KeySink, PressedKeyState};
use crate::{Combo, Key};

/// A single output step run when a gesture resolves or is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    /// Press and release the combo before the next step
    Tap(Combo),
    /// Hold the combo down
    Down(Combo),
    /// Release a held combo
    Up(Combo),
}

impl ActionStep {
    /// Run this step against a sink
    pub fn run<S: KeySink + ?Sized>(&self, sink: &mut S) {
        match self {
            ActionStep::Tap(combo) => output::tap(sink, combo),
            ActionStep::Down(combo) => output::register(sink, combo),
            ActionStep::Up(combo) => output::unregister(sink, combo),
        }
    }
}

impl fmt::Display for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStep::Tap(combo) => write!(f, "tap:{}", combo),
            ActionStep::Down(combo) => write!(f, "down:{}", combo),
            ActionStep::Up(combo) => write!(f, "up:{}", combo),
        }
    }
}

/// Press-side and release-side steps for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureActions {
    /// Run once when the gesture is classified
    pub press: Vec<ActionStep>,
    /// Run when the key is released, undoing `press`
    pub release: Vec<ActionStep>,
}

impl GestureActions {
    pub fn new(press: Vec<ActionStep>, release: Vec<ActionStep>) -> Self {
        Self { press, release }
    }

    /// `taps` taps of `tapped`, then hold `held` until release
    fn taps_then_hold(tapped: &Combo, taps: usize, held: Combo) -> Self {
        let mut press: Vec<ActionStep> = (0..taps).map(|_| ActionStep::Tap(tapped.clone())).collect();
        press.push(ActionStep::Down(held.clone()));
        Self::new(press, vec![ActionStep::Up(held)])
    }

    /// Keys that would still be down after running `press` then `release`
    pub fn leftover_keys(&self) -> Vec<Key> {
        let mut held = PressedKeyState::new();
        for step in self.press.iter().chain(self.release.iter()) {
            match step {
                ActionStep::Tap(_) => {}
                ActionStep::Down(combo) => {
                    for key in output::ComboActionSequence::for_combo(combo).press_order() {
                        held.add(key);
                    }
                }
                ActionStep::Up(combo) => {
                    for key in output::ComboActionSequence::for_combo(combo).release_order() {
                        held.remove(key);
                    }
                }
            }
        }
        held.get_all()
    }
}

/// Static configuration of one dance-enabled key
#[derive(Debug, Clone)]
pub struct OverloadedKeySpec {
    name: String,
    trigger: Key,
    base: Key,
    actions: IndexMap<GestureCategory, GestureActions>,
}

impl OverloadedKeySpec {
    /// A key with no category actions at all
    pub fn empty(name: impl Into<String>, trigger: Key, base: Key) -> Self {
        Self {
            name: name.into(),
            trigger,
            base,
            actions: IndexMap::new(),
        }
    }

    /// The standard table: tap/double/triple tap the base key,
    /// hold for Alt+base, double hold for Shift+Alt+base.
    pub fn standard(name: impl Into<String>, trigger: Key, base: Key) -> Self {
        let plain = Combo::plain(base);
        let alt = Combo::alt(base);
        let shift_alt = Combo::shift_alt(base);

        let mut spec = Self::empty(name, trigger, base);
        spec.set_action(GestureCategory::SingleTap, GestureActions::taps_then_hold(&plain, 0, plain.clone()));
        spec.set_action(GestureCategory::SingleHold, GestureActions::taps_then_hold(&plain, 0, alt.clone()));
        spec.set_action(GestureCategory::DoubleTap, GestureActions::taps_then_hold(&plain, 1, plain.clone()));
        spec.set_action(GestureCategory::DoubleHold, GestureActions::taps_then_hold(&plain, 0, shift_alt.clone()));
        spec.set_action(
            GestureCategory::DoubleSingleTap,
            GestureActions::taps_then_hold(&plain, 1, plain.clone()),
        );
        spec.set_action(GestureCategory::TripleTap, GestureActions::taps_then_hold(&plain, 2, plain.clone()));
        spec.set_action(GestureCategory::TripleHold, GestureActions::taps_then_hold(&shift_alt, 1, alt));
        spec
    }

    /// Replace the actions for one category
    pub fn set_action(&mut self, category: GestureCategory, actions: GestureActions) {
        self.actions.insert(category, actions);
    }

    /// Builder form of [`set_action`](Self::set_action)
    pub fn with_action(mut self, category: GestureCategory, actions: GestureActions) -> Self {
        self.set_action(category, actions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The logical key that triggers this dance
    pub fn trigger(&self) -> Key {
        self.trigger
    }

    /// The base key the standard table is built from
    pub fn base(&self) -> Key {
        self.base
    }

    /// Actions for a category, if configured
    pub fn actions_for(&self, category: GestureCategory) -> Option<&GestureActions> {
        self.actions.get(&category)
    }

    /// Iterate over configured categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (GestureCategory, &GestureActions)> + '_ {
        self.actions.iter().map(|(c, a)| (*c, a))
    }
}

/// The category a key resolved to and has not yet released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveGestureState {
    pub key: Key,
    pub category: GestureCategory,
}

/// Per-key slots of resolved-but-unreleased gestures.
///
/// Owned by the dispatch engine and lent to the [`DanceTable`].
#[derive(Debug, Clone, Default)]
pub struct ActiveGestures {
    slots: HashMap<Key, ActiveGestureState>,
}

impl ActiveGestures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: Key) -> Option<&ActiveGestureState> {
        self.slots.get(&key)
    }

    pub fn is_active(&self, key: Key) -> bool {
        self.slots.contains_key(&key)
    }

    /// Keys with an active gesture, sorted by code
    pub fn keys(&self) -> SmallVec<[Key; 4]> {
        let mut keys: SmallVec<[Key; 4]> = self.slots.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn insert(&mut self, state: ActiveGestureState) {
        self.slots.insert(state.key, state);
    }

    fn take(&mut self, key: Key) -> Option<ActiveGestureState> {
        self.slots.remove(&key)
    }
}

/// Gesture action table: category → output steps, per dance-enabled key
#[derive(Debug, Clone, Default)]
pub struct DanceTable {
    specs: IndexMap<Key, OverloadedKeySpec>,
}

impl DanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from specs. A later spec for the same trigger replaces an earlier one.
    pub fn from_specs(specs: impl IntoIterator<Item = OverloadedKeySpec>) -> Self {
        let mut table = Self::new();
        for spec in specs {
            table.add(spec);
        }
        table
    }

    /// Register a dance-enabled key
    pub fn add(&mut self, spec: OverloadedKeySpec) {
        if let Some(old) = self.specs.insert(spec.trigger(), spec) {
            log::warn!("dance '{}' on {} replaced", old.name(), old.trigger());
        }
    }

    /// Check if a key is dance-enabled
    pub fn is_trigger(&self, key: Key) -> bool {
        self.specs.contains_key(&key)
    }

    pub fn get(&self, key: Key) -> Option<&OverloadedKeySpec> {
        self.specs.get(&key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverloadedKeySpec> {
        self.specs.values()
    }

    /// Run the press-side steps for `category` and record it as active.
    ///
    /// Returns false, emitting nothing, if the key already has an active
    /// category: its release-side undo must run first.
    pub fn on_classified<S: KeySink + ?Sized>(
        &self,
        active: &mut ActiveGestures,
        category: GestureCategory,
        key: Key,
        sink: &mut S,
    ) -> bool {
        if let Some(prior) = active.get(key) {
            log::warn!(
                "{} resolved as {} while {} is still active; ignoring",
                key,
                category,
                prior.category
            );
            return false;
        }

        match self.get(key).and_then(|spec| spec.actions_for(category)) {
            Some(actions) => {
                for step in &actions.press {
                    step.run(sink);
                }
            }
            None => log::debug!("{} resolved as {} with no actions", key, category),
        }
        active.insert(ActiveGestureState { key, category });
        true
    }

    /// Run the release-side steps for the key's recorded category and clear it.
    ///
    /// No recorded category is a no-op. Returns the category that was undone.
    pub fn on_released<S: KeySink + ?Sized>(
        &self,
        active: &mut ActiveGestures,
        key: Key,
        sink: &mut S,
    ) -> Option<GestureCategory> {
        let state = active.take(key)?;
        if let Some(actions) = self.get(key).and_then(|spec| spec.actions_for(state.category)) {
            for step in &actions.release {
                step.run(sink);
            }
        }
        Some(state.category)
    }
}
