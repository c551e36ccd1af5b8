// Tapdance Hold Intercept
// Replaces the hold meaning of layer-tap style keys with an explicit combo

use crate::event::KeyEvent;
use crate::output::{self, KeySink};
use crate::Combo;
use crate::Key;

/// Result of running an event through the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// The substitute was emitted; no further processing for this event
    Consumed,
    /// Normal processing continues unmodified
    Passthrough,
}

/// One alternate-hold entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldInterceptSpec {
    pub name: String,
    pub key: Key,
    /// Only match on this layer; `None` matches any layer
    pub layer: Option<u8>,
    /// Tapped when the key is held
    pub substitute: Combo,
}

impl HoldInterceptSpec {
    pub fn new(name: impl Into<String>, key: Key, substitute: Combo) -> Self {
        Self {
            name: name.into(),
            key,
            layer: None,
            substitute,
        }
    }

    /// Restrict the entry to one layer
    pub fn on_layer(mut self, layer: u8) -> Self {
        self.layer = Some(layer);
        self
    }

    fn matches(&self, key: Key, layer: u8) -> bool {
        self.key == key && self.layer.map_or(true, |l| l == layer)
    }
}

/// Stateless filter consulted before any other key processing
#[derive(Debug, Clone, Default)]
pub struct HoldInterceptFilter {
    specs: Vec<HoldInterceptSpec>,
}

impl HoldInterceptFilter {
    pub fn new(specs: Vec<HoldInterceptSpec>) -> Self {
        Self { specs }
    }

    pub fn add(&mut self, spec: HoldInterceptSpec) {
        self.specs.push(spec);
    }

    pub fn specs(&self) -> &[HoldInterceptSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Entry for a key on a layer; a layer-specific entry wins over a wildcard
    pub fn lookup(&self, key: Key, layer: u8) -> Option<&HoldInterceptSpec> {
        let mut wildcard = None;
        for spec in self.specs.iter().filter(|s| s.matches(key, layer)) {
            if spec.layer.is_some() {
                return Some(spec);
            }
            if wildcard.is_none() {
                wildcard = Some(spec);
            }
        }
        wildcard
    }

    /// Emit the substitute for a held press of a registered key
    pub fn intercept<S: KeySink + ?Sized>(&self, event: &KeyEvent, sink: &mut S) -> InterceptOutcome {
        if !event.is_press() || !event.is_hold() {
            return InterceptOutcome::Passthrough;
        }
        match self.lookup(event.key, event.layer) {
            Some(spec) => {
                log::debug!("hold on {} intercepted by '{}': {}", event.key, spec.name, spec.substitute);
                output::tap(sink, &spec.substitute);
                InterceptOutcome::Consumed
            }
            None => InterceptOutcome::Passthrough,
        }
    }
}
