//! Reconnecting client
//!
//! A `ReconnectingClient` owns at most one live connection to one daemon and
//! keeps it alive across failures:
//!
//! - `connect` dials under the exclusive connection hold and, on success,
//!   starts the keepalive task and an initial snapshot refresh
//! - every command goes through `execute`, which fails fast with
//!   `NotConnected` unless the client is connected and otherwise runs the
//!   operation under the shared hold
//! - a failing keepalive probe tears the connection down and retries the dial
//!   every `retry_interval` until it succeeds or the client is closed
//! - `close` is terminal
//!
//! Handles are cheap to clone and all refer to the same client.

mod keepalive;
mod state;

pub use state::ConnectionState;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use mpd_protocol::{Connection, Dialer, NetAddr, Subsystem};
use mpd_state::{CurrentSong, Playlist, SnapshotCache, Status};
use tokio::sync::{broadcast, watch, Notify, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::config::ClientOptions;
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, Dispatcher, Listeners};
use crate::probe::{KeepaliveProbe, RefreshProbe};

/// A live connection plus the stop signal of its keepalive task
struct Session {
    connection: Box<dyn Connection>,
    keepalive_stop: Option<watch::Sender<bool>>,
}

pub(crate) struct Inner {
    addr: NetAddr,
    options: ClientOptions,
    dialer: Arc<dyn Dialer>,
    probe: Arc<dyn KeepaliveProbe>,

    /// The connection hold: shared for commands, exclusive for (re)dialing
    session: RwLock<Option<Session>>,
    state: watch::Sender<ConnectionState>,
    /// Flipped to true exactly once, by `close`
    closed: watch::Sender<bool>,
    reconnecting: AtomicBool,
    /// Wakes a parked `idle` so it sends `noidle` and releases its hold
    idle_interrupt: Notify,
    /// Tasks waiting for the connection that a pending `idle` must yield to
    idle_blockers: AtomicUsize,

    pub(crate) snapshots: SnapshotCache,
    pub(crate) listeners: Listeners,
    pub(crate) events: broadcast::Sender<ClientEvent>,
    pub(crate) dispatcher: Dispatcher,
}

/// Client for one daemon address that reconnects on failure
#[derive(Clone)]
pub struct ReconnectingClient {
    pub(crate) inner: Arc<Inner>,
}

impl ReconnectingClient {
    /// Create a disconnected client
    ///
    /// Nothing is dialed until `connect` is called. Use `open` to also start
    /// the first connection the way `options.blocking` asks for.
    pub fn new(addr: NetAddr, dialer: Arc<dyn Dialer>, options: ClientOptions) -> Result<Self> {
        options.validate()?;

        let probe: Arc<dyn KeepaliveProbe> = match &options.probe {
            Some(probe) => Arc::clone(probe),
            None => Arc::new(RefreshProbe),
        };
        let (events, _) = broadcast::channel(options.event_capacity);
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (closed, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(Inner {
                addr,
                options,
                dialer,
                probe,
                session: RwLock::new(None),
                state,
                closed,
                reconnecting: AtomicBool::new(false),
                idle_interrupt: Notify::new(),
                idle_blockers: AtomicUsize::new(0),
                snapshots: SnapshotCache::new(),
                listeners: Listeners::new(),
                events,
                dispatcher: Dispatcher::new(),
            }),
        })
    }

    /// Create a client and start connecting
    ///
    /// With `options.blocking` the first dial is awaited and its error
    /// returned. Otherwise the dial runs in the background and a failure
    /// starts the reconnect loop; the client is returned immediately.
    pub async fn open(addr: NetAddr, dialer: Arc<dyn Dialer>, options: ClientOptions) -> Result<Self> {
        let client = Self::new(addr, dialer, options)?;

        if client.inner.options.blocking {
            client.connect().await?;
        } else {
            let background = client.clone();
            tokio::spawn(async move {
                if let Err(e) = background.connect().await {
                    warn!(
                        addr = %background.addr(),
                        error = &e as &dyn std::error::Error,
                        "initial connect failed"
                    );
                    background.reconnect().await;
                }
            });
        }

        Ok(client)
    }

    // ==================== Accessors ====================

    pub fn addr(&self) -> &NetAddr {
        &self.inner.addr
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Receiver that observes every state transition
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.closed.borrow()
    }

    /// Subscribe to the stream of published events
    ///
    /// Only events published after the call are received.
    pub fn events(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events.subscribe()
    }

    /// Listener sets, one per event kind
    pub fn listeners(&self) -> &Listeners {
        &self.inner.listeners
    }

    /// Latest status snapshot, if a refresh has completed
    pub fn status(&self) -> Option<Arc<Status>> {
        self.inner.snapshots.status()
    }

    /// Latest queue snapshot
    pub fn playlist(&self) -> Option<Arc<Playlist>> {
        self.inner.snapshots.playlist()
    }

    /// Latest previous/current/next triple
    pub fn current_song(&self) -> Option<Arc<CurrentSong>> {
        self.inner.snapshots.current_song()
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.inner.state.send_replace(state);
        if previous != state {
            debug!(addr = %self.inner.addr, from = %previous, to = %state, "state changed");
        }
    }

    // ==================== Lifecycle ====================

    /// Dial the daemon if not already connected
    ///
    /// Fails with `Closed` after `close`, and with `DialFailed` when the dial
    /// fails. A failed `connect` does not start the reconnect loop.
    pub async fn connect(&self) -> Result<()> {
        let mut session = self.lock_exclusive().await;
        self.connect_locked(&mut session).await
    }

    async fn connect_locked(&self, session: &mut Option<Session>) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        if session.is_some() {
            return Ok(());
        }

        let reconnecting = self.state() == ConnectionState::Reconnecting;
        if !reconnecting {
            self.set_state(ConnectionState::Connecting);
        }

        let dialed = self
            .inner
            .dialer
            .dial(&self.inner.addr, self.inner.options.password.as_deref())
            .await;
        let connection = match dialed {
            Ok(connection) => connection,
            Err(e) => {
                if !reconnecting {
                    self.set_state(ConnectionState::Disconnected);
                }
                return Err(ClientError::DialFailed(e));
            }
        };

        if self.is_closed() {
            connection.close().await.ok();
            return Err(ClientError::Closed);
        }

        let keepalive_stop = self
            .inner
            .options
            .keepalive
            .then(|| keepalive::spawn(self));
        *session = Some(Session {
            connection,
            keepalive_stop,
        });
        self.set_state(ConnectionState::Connected);
        info!(addr = %self.inner.addr, "connected");

        self.publish(ClientEvent::Connected);
        self.spawn_refresh();
        Ok(())
    }

    /// Drop the live connection, if any, and move to `next`
    async fn teardown_locked(
        &self,
        session: &mut Option<Session>,
        next: ConnectionState,
    ) -> Result<()> {
        let Some(old) = session.take() else {
            self.set_state(next);
            return Ok(());
        };

        if let Some(stop) = &old.keepalive_stop {
            stop.send_replace(true);
        }
        let closed = old.connection.close().await;
        self.set_state(next);
        info!(addr = %self.inner.addr, "disconnected");
        self.publish(ClientEvent::Disconnected);

        closed.map_err(ClientError::from)
    }

    /// Close the client for good
    ///
    /// Stops the keepalive task and any reconnect loop, closes the live
    /// connection and returns its close error. Calling it again is a no-op.
    pub async fn close(&self) -> Result<()> {
        if self.inner.closed.send_replace(true) {
            debug!(addr = %self.inner.addr, "client already closed");
            return Ok(());
        }
        info!(addr = %self.inner.addr, "closing client");

        let mut session = self.lock_exclusive().await;
        let result = self.teardown_locked(&mut session, ConnectionState::Closed).await;
        self.set_state(ConnectionState::Closed);
        result
    }

    /// Tear down the current connection and dial until it works again
    ///
    /// Single-flight: returns at once if a cycle is already running. The
    /// exclusive hold is taken per attempt and released across the retry
    /// wait, so commands fail fast with `NotConnected` meanwhile.
    pub(crate) async fn reconnect(&self) {
        if self.inner.reconnecting.swap(true, Ordering::SeqCst) {
            debug!(addr = %self.inner.addr, "reconnect already running");
            return;
        }
        let _flag = ReconnectFlag(&self.inner.reconnecting);

        {
            let mut session = self.lock_exclusive().await;
            if self.is_closed() {
                return;
            }
            if let Err(e) = self
                .teardown_locked(&mut session, ConnectionState::Reconnecting)
                .await
            {
                debug!(
                    addr = %self.inner.addr,
                    error = &e as &dyn std::error::Error,
                    "closing broken connection failed"
                );
            }
        }

        info!(addr = %self.inner.addr, "reconnecting");
        let started = Instant::now();
        let mut closed = self.inner.closed.subscribe();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let result = {
                let mut session = self.lock_exclusive().await;
                self.connect_locked(&mut session).await
            };

            match result {
                Ok(()) => {
                    info!(
                        addr = %self.inner.addr,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "reconnected"
                    );
                    return;
                }
                Err(ClientError::Closed) => {
                    info!(addr = %self.inner.addr, attempt, "reconnect aborted, client closed");
                    return;
                }
                Err(e) => {
                    warn!(
                        addr = %self.inner.addr,
                        attempt,
                        error = &e as &dyn std::error::Error,
                        "reconnect attempt failed"
                    );
                }
            }

            tokio::select! {
                _ = signalled(&mut closed) => {
                    info!(addr = %self.inner.addr, attempt, "reconnect aborted, client closed");
                    return;
                }
                _ = tokio::time::sleep(self.inner.options.retry_interval) => {}
            }
        }
    }

    /// Take the exclusive hold, first waking any `idle` parked under the
    /// shared one
    async fn lock_exclusive(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        let _blocker = self.block_idle();
        self.inner.session.write().await
    }

    /// Register a task that needs the connection and interrupt pending idles
    ///
    /// Until the returned guard drops, new `idle` calls return at once
    /// instead of parking on the connection.
    fn block_idle(&self) -> IdleBlocker<'_> {
        self.inner.idle_blockers.fetch_add(1, Ordering::SeqCst);
        self.inner.idle_interrupt.notify_waiters();
        IdleBlocker(&self.inner.idle_blockers)
    }

    fn spawn_refresh(&self) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.reload_status().await {
                debug!(
                    addr = %client.addr(),
                    error = &e as &dyn std::error::Error,
                    "initial refresh failed"
                );
            }
        });
    }

    // ==================== Commands ====================

    /// Run `op` against the live connection under the shared hold
    ///
    /// Fails with `NotConnected` unless the client is connected. The
    /// connection reference must not escape `op`'s future. Wait for changes
    /// with `idle` rather than sending `idle` through here: only the former
    /// gives way to reconnects and `close`.
    ///
    /// ```rust,ignore
    /// let status = client
    ///     .execute(|conn| Box::pin(async move { conn.status().await }))
    ///     .await?;
    /// ```
    pub async fn execute<T, E, F>(&self, op: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c dyn Connection) -> BoxFuture<'c, std::result::Result<T, E>>,
        E: Into<ClientError>,
        T: Send,
    {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let guard = self.inner.session.read().await;
        let Some(session) = guard.as_ref() else {
            return Err(ClientError::NotConnected);
        };
        op(session.connection.as_ref()).await.map_err(Into::into)
    }

    /// Send `ping` over the live connection
    pub async fn ping(&self) -> Result<()> {
        self.execute(|conn| Box::pin(async move { conn.ping().await }))
            .await
    }

    /// Refresh the snapshot cache now
    pub async fn reload_status(&self) -> Result<()> {
        let client = self.clone();
        self.execute(move |conn| Box::pin(async move { client.refresh_with(conn).await }))
            .await
    }

    /// Wait until one of `subsystems` changes on the daemon
    ///
    /// An empty list waits on `options.watch_subsystems`, and an empty watch
    /// list on every subsystem. Changed subsystems are also published to the
    /// "subsystems changed" listeners.
    ///
    /// The wait ends early, with whatever the daemon had collected so far
    /// (often nothing), when `no_idle` is called or when a keepalive tick,
    /// a reconnect or `close` needs the connection. Callers that watch in a
    /// loop simply call `idle` again.
    pub async fn idle(&self, subsystems: &[Subsystem]) -> Result<Vec<Subsystem>> {
        let filter = if subsystems.is_empty() {
            self.inner.options.watch_subsystems.clone()
        } else {
            subsystems.to_vec()
        };

        let client = self.clone();
        let changed = self
            .execute(move |conn| Box::pin(async move { client.idle_on(conn, &filter).await }))
            .await?;

        if !changed.is_empty() {
            self.publish(ClientEvent::SubsystemsChanged(changed.clone()));
        }
        Ok(changed)
    }

    async fn idle_on(&self, conn: &dyn Connection, filter: &[Subsystem]) -> Result<Vec<Subsystem>> {
        let interrupted = self.inner.idle_interrupt.notified();
        tokio::pin!(interrupted);
        // Registered before the blocker check, so no interrupt is lost between them
        interrupted.as_mut().enable();

        if self.inner.idle_blockers.load(Ordering::SeqCst) > 0 {
            debug!(addr = %self.inner.addr, "idle skipped, connection wanted elsewhere");
            // Callers re-idle in a loop; let the blocking task run first
            tokio::task::yield_now().await;
            return Ok(Vec::new());
        }

        let pending = conn.idle(filter);
        tokio::pin!(pending);

        tokio::select! {
            changed = &mut pending => return changed.map_err(ClientError::from),
            _ = &mut interrupted => {}
        }

        debug!(addr = %self.inner.addr, "interrupting idle");
        let mut changed = conn.no_idle().await?;
        for subsystem in pending.await? {
            if !changed.contains(&subsystem) {
                changed.push(subsystem);
            }
        }
        Ok(changed)
    }

    /// Interrupt a pending `idle`
    ///
    /// Does not wait for the connection: the pending `idle` sends `noidle`
    /// itself and returns the changes the daemon reports. A no-op when no
    /// `idle` is pending.
    pub fn no_idle(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.inner.idle_interrupt.notify_waiters();
        Ok(())
    }
}

impl fmt::Debug for ReconnectingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconnectingClient")
            .field("addr", &self.inner.addr)
            .field("state", &self.state())
            .finish()
    }
}

/// Clears the single-flight flag when the reconnect cycle ends
struct ReconnectFlag<'a>(&'a AtomicBool);

impl Drop for ReconnectFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Keeps new `idle` calls from parking while a task waits for the connection
struct IdleBlocker<'a>(&'a AtomicUsize);

impl Drop for IdleBlocker<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolve once the flag behind `rx` is true or its sender is gone
async fn signalled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
