//! Scripted in-memory server for tests
//!
//! `MockServer` holds the state a real daemon would report (status record,
//! queue, pending idle changes) and hands out `MockDialer`s whose
//! connections answer from that state. Failure toggles and counters use
//! atomics so tests can flip them while clients are running.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::addr::NetAddr;
use crate::attrs::Attrs;
use crate::command::Command;
use crate::connection::{Connection, Dialer};
use crate::error::{ProtocolError, Result};
use crate::subsystem::Subsystem;

#[derive(Default)]
struct ServerState {
    status: Attrs,
    playlist: Vec<Attrs>,
    password: Option<String>,
    pending_changes: Vec<Subsystem>,
    idle_interrupted: bool,
    command_counts: HashMap<String, u32>,
}

struct Shared {
    state: Mutex<ServerState>,
    idle_wake: Notify,
    fail_dial: AtomicBool,
    fail_next_dials: AtomicU32,
    fail_commands: AtomicBool,
    fail_next_commands: AtomicU32,
    dial_count: AtomicU32,
    close_count: AtomicU32,
    open_connections: AtomicU32,
}

/// In-memory stand-in for a daemon
///
/// Cloning yields another handle to the same server.
#[derive(Clone)]
pub struct MockServer {
    shared: Arc<Shared>,
}

impl MockServer {
    /// Create a server reporting a stopped player with an empty queue
    pub fn new() -> Self {
        let server = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ServerState::default()),
                idle_wake: Notify::new(),
                fail_dial: AtomicBool::new(false),
                fail_next_dials: AtomicU32::new(0),
                fail_commands: AtomicBool::new(false),
                fail_next_commands: AtomicU32::new(0),
                dial_count: AtomicU32::new(0),
                close_count: AtomicU32::new(0),
                open_connections: AtomicU32::new(0),
            }),
        };
        server.set_status(
            Attrs::new()
                .with("volume", "50")
                .with("state", "stop")
                .with("playlist", "1")
                .with("playlistlength", "0"),
        );
        server
    }

    fn state(&self) -> MutexGuard<'_, ServerState> {
        match self.shared.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// A dialer whose connections talk to this server
    pub fn dialer(&self) -> MockDialer {
        MockDialer {
            server: self.clone(),
        }
    }

    /// Replace the record returned by `status`
    pub fn set_status(&self, status: Attrs) {
        self.state().status = status;
    }

    /// Replace the queue returned by `playlistinfo`
    pub fn set_playlist(&self, playlist: Vec<Attrs>) {
        self.state().playlist = playlist;
    }

    /// Require this password on dial
    pub fn set_password(&self, password: Option<&str>) {
        self.state().password = password.map(str::to_string);
    }

    /// Queue a change for the next `idle`
    pub fn push_change(&self, subsystem: Subsystem) {
        {
            let mut state = self.state();
            if !state.pending_changes.contains(&subsystem) {
                state.pending_changes.push(subsystem);
            }
        }
        self.shared.idle_wake.notify_one();
    }

    /// Make every dial fail until switched off
    pub fn set_fail_dial(&self, should_fail: bool) {
        self.shared.fail_dial.store(should_fail, Ordering::SeqCst);
    }

    /// Make the next `n` dials fail
    pub fn fail_next_dials(&self, n: u32) {
        self.shared.fail_next_dials.store(n, Ordering::SeqCst);
    }

    /// Make every command on every connection fail until switched off
    pub fn set_fail_commands(&self, should_fail: bool) {
        self.shared.fail_commands.store(should_fail, Ordering::SeqCst);
    }

    /// Make the next `n` commands fail, whatever connection they arrive on
    pub fn fail_next_commands(&self, n: u32) {
        self.shared.fail_next_commands.store(n, Ordering::SeqCst);
    }

    /// Number of dial attempts, failed ones included
    pub fn dial_count(&self) -> u32 {
        self.shared.dial_count.load(Ordering::SeqCst)
    }

    /// Number of connections closed by their client
    pub fn close_count(&self) -> u32 {
        self.shared.close_count.load(Ordering::SeqCst)
    }

    /// Connections dialed and not yet closed
    pub fn open_connections(&self) -> u32 {
        self.shared.open_connections.load(Ordering::SeqCst)
    }

    /// How many times a command name was received, failed ones included
    pub fn command_count(&self, name: &str) -> u32 {
        self.state().command_counts.get(name).copied().unwrap_or(0)
    }

    fn take_failure(flag: &AtomicBool, remaining: &AtomicU32) -> bool {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn drain_changes(&self) -> Vec<Attrs> {
        let mut state = self.state();
        state.idle_interrupted = false;
        let changes = std::mem::take(&mut state.pending_changes);
        if changes.is_empty() {
            return Vec::new();
        }
        vec![changes
            .iter()
            .map(|subsystem| ("changed", subsystem.as_str()))
            .collect()]
    }

    async fn wait_for_changes(&self) -> Vec<Attrs> {
        loop {
            {
                let state = self.state();
                if !state.pending_changes.is_empty() || state.idle_interrupted {
                    drop(state);
                    return self.drain_changes();
                }
            }
            self.shared.idle_wake.notified().await;
        }
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

/// `Dialer` connected to a `MockServer`
#[derive(Clone)]
pub struct MockDialer {
    server: MockServer,
}

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(&self, addr: &NetAddr, password: Option<&str>) -> Result<Box<dyn Connection>> {
        let shared = &self.server.shared;
        shared.dial_count.fetch_add(1, Ordering::SeqCst);

        if MockServer::take_failure(&shared.fail_dial, &shared.fail_next_dials) {
            return Err(ProtocolError::Dial {
                addr: addr.clone(),
                message: "connection refused".to_string(),
            });
        }

        let expected = self.server.state().password.clone();
        if let Some(expected) = expected {
            if password != Some(expected.as_str()) {
                return Err(ProtocolError::Auth("incorrect password".to_string()));
            }
        }

        shared.open_connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            server: self.server.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Connection handed out by `MockDialer`
pub struct MockConnection {
    server: MockServer,
    closed: AtomicBool,
}

#[async_trait]
impl Connection for MockConnection {
    async fn issue(&self, command: &Command) -> Result<Vec<Attrs>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProtocolError::Closed);
        }

        let shared = &self.server.shared;
        *self
            .server
            .state()
            .command_counts
            .entry(command.name.clone())
            .or_insert(0) += 1;

        if MockServer::take_failure(&shared.fail_commands, &shared.fail_next_commands) {
            return Err(ProtocolError::Io("connection reset by peer".to_string()));
        }

        match command.name.as_str() {
            "status" => {
                let status = self.server.state().status.clone();
                Ok(vec![status])
            }
            "ping" => Ok(Vec::new()),
            "playlistinfo" => {
                let playlist = self.server.state().playlist.clone();
                match command.args.first() {
                    None => Ok(playlist),
                    Some(range) => slice_playlist(&playlist, range, command),
                }
            }
            "idle" => Ok(self.server.wait_for_changes().await),
            "noidle" => {
                self.server.state().idle_interrupted = true;
                shared.idle_wake.notify_one();
                Ok(Vec::new())
            }
            _ => Err(ProtocolError::Server {
                code: 5,
                command: command.name.clone(),
                message: "unknown command".to_string(),
            }),
        }
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(ProtocolError::Closed);
        }
        let shared = &self.server.shared;
        shared.close_count.fetch_add(1, Ordering::SeqCst);
        shared.open_connections.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

fn slice_playlist(playlist: &[Attrs], range: &str, command: &Command) -> Result<Vec<Attrs>> {
    let bad_index = || ProtocolError::Server {
        code: 2,
        command: command.name.clone(),
        message: "Bad song index".to_string(),
    };

    let (start, end) = range.split_once(':').ok_or_else(bad_index)?;
    let start: usize = start.parse().map_err(|_| bad_index())?;
    let end: usize = end.parse().map_err(|_| bad_index())?;
    if start > playlist.len() || end < start {
        return Err(bad_index());
    }
    Ok(playlist[start..end.min(playlist.len())].to_vec())
}
