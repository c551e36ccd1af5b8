// Tapdance Decision Timers
// One cancelable deadline per in-flight gesture, fired by polling

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::Millis;
use crate::Key;

/// Deadlines for open decision windows, keyed by the gesture's key.
///
/// A deadline is the last millisecond still inside the window; it fires
/// once the clock is strictly past it. Nothing fires on its own: the owner
/// calls [`expire`](Self::expire) with the current time, typically before
/// handling each event and from the firmware's idle poll.
#[derive(Debug, Clone, Default)]
pub struct DecisionTimers {
    deadlines: IndexMap<Key, Millis>,
}

impl DecisionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the deadline for a key
    pub fn schedule(&mut self, key: Key, deadline: Millis) {
        self.deadlines.insert(key, deadline);
    }

    /// Cancel a key's deadline. Returns true if one was pending.
    pub fn cancel(&mut self, key: Key) -> bool {
        self.deadlines.shift_remove(&key).is_some()
    }

    pub fn deadline(&self, key: Key) -> Option<Millis> {
        self.deadlines.get(&key).copied()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Millis> {
        self.deadlines.values().copied().min()
    }

    /// Remove and return every key whose deadline is strictly before `now`,
    /// earliest first
    pub fn expire(&mut self, now: Millis) -> SmallVec<[Key; 2]> {
        let mut due: SmallVec<[(Millis, Key); 2]> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline < now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.deadlines.shift_remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_expire() {
        let mut timers = DecisionTimers::new();
        timers.schedule(Key::from(183), 200);

        assert!(timers.expire(199).is_empty());
        // Still open at the deadline itself
        assert!(timers.expire(200).is_empty());
        assert_eq!(timers.expire(201).as_slice(), &[Key::from(183)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let mut timers = DecisionTimers::new();
        timers.schedule(Key::from(183), 200);
        timers.schedule(Key::from(183), 350);

        assert!(timers.expire(350).is_empty());
        assert_eq!(timers.deadline(Key::from(183)), Some(350));
    }

    #[test]
    fn test_cancel() {
        let mut timers = DecisionTimers::new();
        timers.schedule(Key::from(183), 200);
        assert!(timers.cancel(Key::from(183)));
        assert!(!timers.cancel(Key::from(183)));
        assert!(timers.expire(1_000).is_empty());
    }

    #[test]
    fn test_expire_orders_by_deadline() {
        let mut timers = DecisionTimers::new();
        timers.schedule(Key::from(184), 300);
        timers.schedule(Key::from(183), 250);
        assert_eq!(timers.next_deadline(), Some(250));
        assert_eq!(
            timers.expire(400).as_slice(),
            &[Key::from(183), Key::from(184)]
        );
    }
}
