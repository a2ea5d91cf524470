use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use quiz_core::model::CallbackId;

/// Remembers the most recent callback ids so a redelivered button press is
/// processed once.
///
/// A window of 1 catches back-to-back duplicates only; larger windows also
/// catch a duplicate that arrives after other callbacks.
pub struct CallbackDeduplicator {
    window: usize,
    recent: Mutex<VecDeque<CallbackId>>,
}

impl CallbackDeduplicator {
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            recent: Mutex::new(VecDeque::with_capacity(window)),
        }
    }

    /// Returns `true` the first time `id` is seen within the window and records
    /// it; `false` for a duplicate.
    pub fn first_delivery(&self, id: &CallbackId) -> bool {
        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        if recent.contains(id) {
            return false;
        }
        if recent.len() == self.window {
            recent.pop_front();
        }
        recent.push_back(id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> CallbackId {
        CallbackId::new(raw)
    }

    #[test]
    fn drops_back_to_back_duplicates() {
        let dedup = CallbackDeduplicator::new(1);
        assert!(dedup.first_delivery(&id("a")));
        assert!(!dedup.first_delivery(&id("a")));
        assert!(dedup.first_delivery(&id("b")));
    }

    #[test]
    fn single_slot_forgets_after_another_event() {
        let dedup = CallbackDeduplicator::new(1);
        assert!(dedup.first_delivery(&id("a")));
        assert!(dedup.first_delivery(&id("b")));
        assert!(dedup.first_delivery(&id("a")));
    }

    #[test]
    fn wider_window_remembers_older_ids() {
        let dedup = CallbackDeduplicator::new(3);
        for raw in ["a", "b", "c"] {
            assert!(dedup.first_delivery(&id(raw)));
        }
        assert!(!dedup.first_delivery(&id("a")));
        assert!(dedup.first_delivery(&id("d")));
        assert!(dedup.first_delivery(&id("a")));
    }
}
