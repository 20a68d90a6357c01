//! Options for a reconnecting client
//!
//! `ClientOptions` is fixed when a client is created. The client cache keeps
//! the options an entry was created with; a later lookup for the same address
//! gets the existing entry and its original options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mpd_protocol::Subsystem;

use crate::error::ClientError;
use crate::probe::KeepaliveProbe;

/// Configuration for a `ReconnectingClient`
#[derive(Clone)]
pub struct ClientOptions {
    /// Await the first connection attempt and return its error
    /// Default: false (connect in the background, reconnect on failure)
    pub blocking: bool,

    /// Password sent when dialing
    /// Default: None
    pub password: Option<String>,

    /// Run the periodic keepalive probe while connected
    /// Default: true
    pub keepalive: bool,

    /// Period of the keepalive probe
    /// Default: 60 seconds
    pub keepalive_interval: Duration,

    /// Constant wait between reconnect attempts
    /// Default: 1 second
    pub retry_interval: Duration,

    /// Probe run on each keepalive tick
    /// Default: None, which refreshes the snapshot cache
    pub probe: Option<Arc<dyn KeepaliveProbe>>,

    /// Subsystems `idle` waits on when called with an empty list
    /// Default: empty (every subsystem)
    pub watch_subsystems: Vec<Subsystem>,

    /// Buffer size of the broadcast event stream
    /// Default: 64
    pub event_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            blocking: false,
            password: None,
            keepalive: true,
            keepalive_interval: Duration::from_secs(60),
            retry_interval: Duration::from_secs(1),
            probe: None,
            watch_subsystems: Vec::new(),
            event_capacity: 64,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("blocking", &self.blocking)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keepalive", &self.keepalive)
            .field("keepalive_interval", &self.keepalive_interval)
            .field("retry_interval", &self.retry_interval)
            .field("custom_probe", &self.probe.is_some())
            .field("watch_subsystems", &self.watch_subsystems)
            .field("event_capacity", &self.event_capacity)
            .finish()
    }
}

impl ClientOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose first connection attempt is awaited
    pub fn blocking() -> Self {
        Self {
            blocking: true,
            ..Default::default()
        }
    }

    /// Options with the keepalive probe switched off
    pub fn without_keepalive() -> Self {
        Self {
            keepalive: false,
            ..Default::default()
        }
    }

    /// Validate the options and return any issues
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.keepalive && self.keepalive_interval == Duration::ZERO {
            return Err(ClientError::Configuration(
                "Keepalive interval must be greater than 0".to_string(),
            ));
        }

        if self.retry_interval == Duration::ZERO {
            return Err(ClientError::Configuration(
                "Retry interval must be greater than 0".to_string(),
            ));
        }

        if self.event_capacity == 0 {
            return Err(ClientError::Configuration(
                "Event capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_keepalive(mut self, enabled: bool) -> Self {
        self.keepalive = enabled;
        self
    }

    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn KeepaliveProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_watch_subsystems(mut self, subsystems: impl IntoIterator<Item = Subsystem>) -> Self {
        self.watch_subsystems = subsystems.into_iter().collect();
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::PingProbe;

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert!(!options.blocking);
        assert!(options.keepalive);
        assert_eq!(options.keepalive_interval, Duration::from_secs(60));
        assert_eq!(options.retry_interval, Duration::from_secs(1));
        assert!(options.probe.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_validation() {
        let no_retry_wait = ClientOptions {
            retry_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            no_retry_wait.validate(),
            Err(ClientError::Configuration(_))
        ));

        let no_keepalive_wait = ClientOptions::new().with_keepalive_interval(Duration::ZERO);
        assert!(no_keepalive_wait.validate().is_err());

        // A zero period is irrelevant once keepalive is off
        let off = no_keepalive_wait.with_keepalive(false);
        assert!(off.validate().is_ok());

        assert!(ClientOptions::new().with_event_capacity(0).validate().is_err());
    }

    #[test]
    fn test_options_presets() {
        let blocking = ClientOptions::blocking();
        assert!(blocking.blocking);
        assert!(blocking.validate().is_ok());

        let quiet = ClientOptions::without_keepalive();
        assert!(!quiet.keepalive);
        assert!(quiet.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let options = ClientOptions::new()
            .with_blocking(true)
            .with_password("hunter2")
            .with_retry_interval(Duration::from_millis(250))
            .with_probe(Arc::new(PingProbe))
            .with_watch_subsystems([Subsystem::Player, Subsystem::Mixer]);

        assert!(options.blocking);
        assert_eq!(options.password.as_deref(), Some("hunter2"));
        assert_eq!(options.retry_interval, Duration::from_millis(250));
        assert!(options.probe.is_some());
        assert_eq!(options.watch_subsystems.len(), 2);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = ClientOptions::new().with_password("hunter2");
        let printed = format!("{:?}", options);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
