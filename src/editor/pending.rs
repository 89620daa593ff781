use crate::core::LineItemId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Stable identity of a row for pending-state tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// A persisted row, keyed by its server id.
    Persisted(LineItemId),
    /// The trailing new-row sentinel.
    Sentinel,
}

/// Per-row in-flight markers, shared between the editor worker and whoever
/// renders the rows.
///
/// A row stays marked while its operation is in flight and through the
/// settle window that follows, success or failure. Marks are counted, so
/// back-to-back operations on the same row do not clear each other early.
#[derive(Clone, Default)]
pub struct PendingRows {
    inner: Arc<Mutex<HashMap<RowKey, usize>>>,
}

impl PendingRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given row currently has an operation in flight or is
    /// still inside its settle window.
    pub fn is_pending(&self, key: &RowKey) -> bool {
        self.lock().contains_key(key)
    }

    /// True when no row has anything in flight.
    pub fn is_idle(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of all currently pending rows.
    pub fn snapshot(&self) -> Vec<RowKey> {
        self.lock().keys().cloned().collect()
    }

    pub(crate) fn mark(&self, key: RowKey) {
        *self.lock().entry(key).or_insert(0) += 1;
    }

    pub(crate) fn clear(&self, key: &RowKey) {
        let mut marks = self.lock();
        if let Some(count) = marks.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                marks.remove(key);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RowKey, usize>> {
        // Marks are plain counters; a panic mid-update cannot corrupt them.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_are_counted_per_key() {
        let pending = PendingRows::new();
        let key = RowKey::Sentinel;

        pending.mark(key.clone());
        pending.mark(key.clone());
        pending.clear(&key);
        assert!(pending.is_pending(&key));

        pending.clear(&key);
        assert!(pending.is_idle());
    }

    #[test]
    fn test_keys_are_independent() {
        let pending = PendingRows::new();
        let x = RowKey::Persisted(LineItemId::from("X"));
        let y = RowKey::Persisted(LineItemId::from("Y"));

        pending.mark(x.clone());
        assert!(pending.is_pending(&x));
        assert!(!pending.is_pending(&y));
    }
}
