//! Identity-keyed listener storage
//!
//! This module provides the one primitive of the crate:
//! - `ListenerSet<L>`: a concurrent set of `Arc<L>` listeners keyed by
//!   `ListenerId`, with snapshot-at-call-time notification

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::id::ListenerId;

// ============================================================================
// Inner storage
// ============================================================================

struct Entries<L: ?Sized> {
    next_id: u64,
    listeners: HashMap<ListenerId, Arc<L>>,
}

impl<L: ?Sized> Entries<L> {
    fn find(&self, listener: &Arc<L>) -> Option<ListenerId> {
        self.listeners
            .iter()
            .find(|(_, existing)| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(listener)))
            .map(|(id, _)| *id)
    }
}

// ============================================================================
// ListenerSet<L> - set of listeners for one kind of event
// ============================================================================

/// Concurrent set of listeners for a single event kind
///
/// `L` is usually a trait object (`dyn StatusListener`), so one set holds
/// heterogeneous listeners that share a capability. Membership is keyed by
/// the identity of the `Arc`: adding the same `Arc` twice returns the
/// original `ListenerId` and does not register it a second time.
///
/// Cloning a `ListenerSet` yields another handle to the same membership.
///
/// # Example
///
/// ```rust
/// use listener_set::ListenerSet;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Hello;
/// impl Greeter for Hello {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let set: ListenerSet<dyn Greeter> = ListenerSet::new();
/// let hello: Arc<dyn Greeter> = Arc::new(Hello);
///
/// let id = set.add(hello.clone());
/// assert_eq!(set.add(hello), id);
/// assert_eq!(set.len(), 1);
///
/// let mut greetings = Vec::new();
/// set.notify(|g| greetings.push(g.greet()));
/// assert_eq!(greetings, vec!["hello".to_string()]);
///
/// assert!(set.remove(id));
/// assert!(set.is_empty());
/// ```
pub struct ListenerSet<L: ?Sized> {
    entries: Arc<RwLock<Entries<L>>>,
}

impl<L: ?Sized> ListenerSet<L> {
    /// Create a new empty listener set
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries {
                next_id: 1,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register a listener, returning its handle
    ///
    /// Registering an `Arc` that is already a member is a no-op and returns
    /// the handle from the first registration.
    pub fn add(&self, listener: Arc<L>) -> ListenerId {
        let mut entries = match self.entries.write() {
            Ok(e) => e,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(id) = entries.find(&listener) {
            return id;
        }

        let id = ListenerId::new(entries.next_id);
        entries.next_id += 1;
        entries.listeners.insert(id, listener);
        id
    }

    /// Remove a listener by handle
    ///
    /// Returns whether a listener was removed. Unknown handles are ignored.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.entries
            .write()
            .map(|mut e| e.listeners.remove(&id).is_some())
            .unwrap_or(false)
    }

    /// Remove a listener by the `Arc` it was registered with
    pub fn remove_listener(&self, listener: &Arc<L>) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            return false;
        };

        match entries.find(listener) {
            Some(id) => entries.listeners.remove(&id).is_some(),
            None => false,
        }
    }

    /// Check whether a handle is still registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries
            .read()
            .map(|e| e.listeners.contains_key(&id))
            .unwrap_or(false)
    }

    /// Get the number of registered listeners
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.listeners.len()).unwrap_or(0)
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every listener
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.listeners.clear();
        }
    }

    /// Copy out the current membership
    ///
    /// The returned vector is detached from the set: later adds and removes
    /// do not affect it. Order is unspecified.
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.entries
            .read()
            .map(|e| e.listeners.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Invoke `f` once for every listener registered at call time
    ///
    /// The membership is snapshotted before the first call, and no lock is
    /// held while `f` runs, so listeners may add or remove themselves (or
    /// others) from inside the callback without affecting this pass.
    pub fn notify<F>(&self, mut f: F)
    where
        F: FnMut(&L),
    {
        for listener in self.snapshot() {
            f(&listener);
        }
    }
}

impl<L: ?Sized> Clone for ListenerSet<L> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listener_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Counter: Send + Sync {
        fn hit(&self);
    }

    #[derive(Default)]
    struct Hits(AtomicUsize);

    impl Counter for Hits {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Hits {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_new_empty() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_add_is_idempotent_per_arc() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let hits = Arc::new(Hits::default());

        let first = set.add(hits.clone());
        let second = set.add(hits.clone());
        assert_eq!(first, second);
        assert_eq!(set.len(), 1);

        set.notify(|c| c.hit());
        assert_eq!(hits.count(), 1);
    }

    #[test]
    fn test_distinct_arcs_get_distinct_ids() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let a = set.add(Arc::new(Hits::default()));
        let b = set.add(Arc::new(Hits::default()));
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_by_id() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let id = set.add(Arc::new(Hits::default()));

        assert!(set.contains(id));
        assert!(set.remove(id));
        assert!(!set.contains(id));

        // Second removal is a no-op
        assert!(!set.remove(id));
    }

    #[test]
    fn test_remove_by_listener() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let hits: Arc<dyn Counter> = Arc::new(Hits::default());
        let other: Arc<dyn Counter> = Arc::new(Hits::default());

        set.add(hits.clone());
        assert!(!set.remove_listener(&other));
        assert!(set.remove_listener(&hits));
        assert!(set.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let first = set.add(Arc::new(Hits::default()));
        set.remove(first);
        let second = set.add(Arc::new(Hits::default()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_notify_reaches_every_member() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let a = Arc::new(Hits::default());
        let b = Arc::new(Hits::default());
        set.add(a.clone());
        set.add(b.clone());

        set.notify(|c| c.hit());
        set.notify(|c| c.hit());

        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_membership_changes_during_notify_do_not_affect_pass() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let a = Arc::new(Hits::default());
        set.add(a.clone());

        let late = Arc::new(Hits::default());
        let mut calls = 0;
        set.notify(|c| {
            calls += 1;
            c.hit();
            set.add(late.clone());
            set.clear();
        });

        assert_eq!(calls, 1);
        assert_eq!(a.count(), 1);
        assert_eq!(late.count(), 0);
    }

    #[test]
    fn test_clone_shares_membership() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();
        let cloned = set.clone();

        let id = set.add(Arc::new(Hits::default()));
        assert!(cloned.contains(id));

        cloned.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_concurrent_adds() {
        let set: ListenerSet<dyn Counter> = ListenerSet::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = set.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        set.add(Arc::new(Hits::default()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 200);
    }
}
