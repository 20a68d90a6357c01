//! Generic Listener Registry
//!
//! Concurrency-safe publish/subscribe sets, one per event kind, with
//! identity-keyed membership and opaque handles.
//!
//! # Features
//!
//! - **Capability-polymorphic**: store any `?Sized` listener type, usually a trait object
//! - **Identity Membership**: adding the same `Arc` twice registers it once
//! - **Opaque Handles**: `ListenerId` tokens for removal, never reused
//! - **Snapshot Notification**: membership is copied before callbacks run
//!
//! # Quick Start
//!
//! ```rust
//! use listener_set::ListenerSet;
//! use std::sync::Arc;
//!
//! trait OnVolume: Send + Sync {
//!     fn volume_changed(&self, volume: u8);
//! }
//!
//! struct Printer;
//! impl OnVolume for Printer {
//!     fn volume_changed(&self, volume: u8) {
//!         println!("volume is now {}", volume);
//!     }
//! }
//!
//! let listeners: ListenerSet<dyn OnVolume> = ListenerSet::new();
//! let id = listeners.add(Arc::new(Printer));
//!
//! listeners.notify(|l| l.volume_changed(42));
//!
//! listeners.remove(id);
//! assert!(listeners.is_empty());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ListenerSet<L>
//!     │
//!     └── entries: Arc<RwLock<..>>
//!             │
//!             ├── next_id: u64
//!             └── listeners: HashMap<ListenerId, Arc<L>>
//! ```
//!
//! Delivery is synchronous on the calling thread. Callers that must not
//! block on listener execution time take a `snapshot()` and hand it to a
//! task of their own.

// Modules
pub mod id;
pub mod set;

// Re-exports - Public API
pub use id::ListenerId;
pub use set::ListenerSet;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::id::ListenerId;
    pub use crate::set::ListenerSet;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    trait Sink: Send + Sync {
        fn push(&self, value: &str);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Sink for Recorder {
        fn push(&self, value: &str) {
            self.0.lock().unwrap().push(value.to_string());
        }
    }

    #[test]
    fn test_full_workflow() {
        let set: ListenerSet<dyn Sink> = ListenerSet::new();
        let recorder = Arc::new(Recorder::default());

        let id = set.add(recorder.clone());
        set.notify(|s| s.push("first"));

        set.remove(id);
        set.notify(|s| s.push("second"));

        assert_eq!(*recorder.0.lock().unwrap(), vec!["first".to_string()]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let set: ListenerSet<dyn Sink> = ListenerSet::new();
        set.add(Arc::new(Recorder::default()));

        let snapshot = set.snapshot();
        set.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(set.is_empty());
    }
}
