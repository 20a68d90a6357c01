//! Single-value swap cell

use parking_lot::RwLock;
use std::sync::Arc;

/// Holds the latest `Arc<T>` and replaces it wholesale
///
/// Readers get their own `Arc` and never see a partially written value.
/// Writers swap in a new value and get the previous one back.
pub struct Slot<T> {
    value: RwLock<Option<Arc<T>>>,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    /// Current value, if any
    pub fn load(&self) -> Option<Arc<T>> {
        self.value.read().clone()
    }

    /// Store `value`, returning what was there before
    pub fn swap(&self, value: Arc<T>) -> Option<Arc<T>> {
        self.value.write().replace(value)
    }

    /// Empty the slot, returning what was there
    pub fn take(&self) -> Option<Arc<T>> {
        self.value.write().take()
    }

    pub fn is_empty(&self) -> bool {
        self.value.read().is_none()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
