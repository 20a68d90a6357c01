//! Opaque listener handles
//!
//! A `ListenerId` is handed out by `ListenerSet::add` and is the only thing
//! a caller needs to keep around to unsubscribe later.

use std::fmt;

/// Opaque token identifying one registration in a `ListenerSet`
///
/// Tokens are unique per set and never reused, so removing with a stale
/// token is always a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, mostly useful for logging
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ListenerId::new(7).to_string(), "listener#7");
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(ListenerId::new(1) < ListenerId::new(2));
        assert_eq!(ListenerId::new(3).as_u64(), 3);
    }
}
