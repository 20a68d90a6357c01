//! Client events and listener registration
//!
//! Every event a client publishes goes two ways:
//!
//! - onto a `tokio::sync::broadcast` stream of `ClientEvent`, sent at
//!   publish time in publish order (`ReconnectingClient::events`)
//! - onto a per-kind FIFO queue drained by one worker task per kind, which
//!   calls each registered listener of that kind in turn
//!
//! Listener callbacks therefore never run on the task that detected the
//! change. Events of one kind reach listeners in publish order, while kinds
//! are delivered independently: a slow status listener delays later status
//! events, never a "connected" notification.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use listener_set::ListenerSet;
use mpd_protocol::Subsystem;
use mpd_state::{CurrentSong, Playlist, Status};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::client::{Inner, ReconnectingClient};

const KIND_COUNT: usize = 6;

/// Something that happened on a client
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A connection was established
    Connected,
    /// The connection was torn down
    Disconnected,
    /// The status snapshot differs from the previous one
    StatusChanged(Arc<Status>),
    /// The queue was refetched after its version moved
    PlaylistChanged(Arc<Playlist>),
    /// The previous/current/next triple differs from the previous one
    CurrentSongChanged(Arc<CurrentSong>),
    /// An `idle` call reported changed subsystems
    SubsystemsChanged(Vec<Subsystem>),
}

impl ClientEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Connected => "connected",
            ClientEvent::Disconnected => "disconnected",
            ClientEvent::StatusChanged(_) => "status_changed",
            ClientEvent::PlaylistChanged(_) => "playlist_changed",
            ClientEvent::CurrentSongChanged(_) => "current_song_changed",
            ClientEvent::SubsystemsChanged(_) => "subsystems_changed",
        }
    }

    /// Index of this event's dispatch queue
    fn slot(&self) -> usize {
        match self {
            ClientEvent::Connected => 0,
            ClientEvent::Disconnected => 1,
            ClientEvent::StatusChanged(_) => 2,
            ClientEvent::PlaylistChanged(_) => 3,
            ClientEvent::CurrentSongChanged(_) => 4,
            ClientEvent::SubsystemsChanged(_) => 5,
        }
    }
}

#[async_trait]
pub trait ConnectedListener: Send + Sync {
    async fn on_connected(&self, client: &ReconnectingClient);
}

#[async_trait]
pub trait DisconnectedListener: Send + Sync {
    async fn on_disconnected(&self, client: &ReconnectingClient);
}

#[async_trait]
pub trait StatusChangedListener: Send + Sync {
    async fn on_status_changed(&self, client: &ReconnectingClient, status: Arc<Status>);
}

#[async_trait]
pub trait PlaylistChangedListener: Send + Sync {
    async fn on_playlist_changed(&self, client: &ReconnectingClient, playlist: Arc<Playlist>);
}

#[async_trait]
pub trait CurrentSongChangedListener: Send + Sync {
    async fn on_current_song_changed(&self, client: &ReconnectingClient, song: Arc<CurrentSong>);
}

#[async_trait]
pub trait SubsystemsChangedListener: Send + Sync {
    async fn on_subsystems_changed(&self, client: &ReconnectingClient, subsystems: &[Subsystem]);
}

/// One listener set per event kind
///
/// The sets are shared handles: adding or removing through `client.listeners()`
/// takes effect for the next published event.
#[derive(Default)]
pub struct Listeners {
    pub connected: ListenerSet<dyn ConnectedListener>,
    pub disconnected: ListenerSet<dyn DisconnectedListener>,
    pub status_changed: ListenerSet<dyn StatusChangedListener>,
    pub playlist_changed: ListenerSet<dyn PlaylistChangedListener>,
    pub current_song_changed: ListenerSet<dyn CurrentSongChangedListener>,
    pub subsystems_changed: ListenerSet<dyn SubsystemsChangedListener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered listeners across all sets
    pub fn len(&self) -> usize {
        self.connected.len()
            + self.disconnected.len()
            + self.status_changed.len()
            + self.playlist_changed.len()
            + self.current_song_changed.len()
            + self.subsystems_changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener registered for `event`, in turn
    pub(crate) async fn dispatch(&self, client: &ReconnectingClient, event: &ClientEvent) {
        match event {
            ClientEvent::Connected => {
                for listener in self.connected.snapshot() {
                    listener.on_connected(client).await;
                }
            }
            ClientEvent::Disconnected => {
                for listener in self.disconnected.snapshot() {
                    listener.on_disconnected(client).await;
                }
            }
            ClientEvent::StatusChanged(status) => {
                for listener in self.status_changed.snapshot() {
                    listener.on_status_changed(client, Arc::clone(status)).await;
                }
            }
            ClientEvent::PlaylistChanged(playlist) => {
                for listener in self.playlist_changed.snapshot() {
                    listener.on_playlist_changed(client, Arc::clone(playlist)).await;
                }
            }
            ClientEvent::CurrentSongChanged(song) => {
                for listener in self.current_song_changed.snapshot() {
                    listener.on_current_song_changed(client, Arc::clone(song)).await;
                }
            }
            ClientEvent::SubsystemsChanged(subsystems) => {
                for listener in self.subsystems_changed.snapshot() {
                    listener.on_subsystems_changed(client, subsystems).await;
                }
            }
        }
        trace!(kind = event.kind(), "listeners notified");
    }
}

// ============================================================================
// Dispatch queues
// ============================================================================

/// One unbounded FIFO queue per event kind
///
/// Workers are spawned on the first publish, since a client may be built
/// outside a runtime. Each holds only a weak reference to the client and
/// exits once the client, and with it the sending half, is dropped.
pub(crate) struct Dispatcher {
    queues: Vec<mpsc::UnboundedSender<ClientEvent>>,
    idle_workers: Mutex<Option<Vec<mpsc::UnboundedReceiver<ClientEvent>>>>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        let (queues, receivers): (Vec<_>, Vec<_>) =
            (0..KIND_COUNT).map(|_| mpsc::unbounded_channel()).unzip();
        Self {
            queues,
            idle_workers: Mutex::new(Some(receivers)),
        }
    }

    fn start(&self, inner: &Arc<Inner>) {
        let mut idle_workers = match self.idle_workers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(receivers) = idle_workers.take() else {
            return;
        };
        for receiver in receivers {
            tokio::spawn(drain(Arc::downgrade(inner), receiver));
        }
    }

    fn enqueue(&self, inner: &Arc<Inner>, event: ClientEvent) {
        self.start(inner);
        // The worker outlives every sender, so this cannot fail
        self.queues[event.slot()].send(event).ok();
    }
}

async fn drain(inner: Weak<Inner>, mut queue: mpsc::UnboundedReceiver<ClientEvent>) {
    while let Some(event) = queue.recv().await {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let client = ReconnectingClient { inner };
        client.inner.listeners.dispatch(&client, &event).await;
    }
}

impl ReconnectingClient {
    /// Publish `event` to the broadcast stream and, asynchronously, to listeners
    ///
    /// Never waits: listeners run on the worker for the event's kind.
    pub(crate) fn publish(&self, event: ClientEvent) {
        debug!(addr = %self.addr(), kind = event.kind(), "publishing event");

        // No receivers is fine: the stream is optional
        self.inner.events.send(event.clone()).ok();
        self.inner.dispatcher.enqueue(&self.inner, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter(AtomicU32);

    #[async_trait]
    impl ConnectedListener for Counter {
        async fn on_connected(&self, _client: &ReconnectingClient) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DisconnectedListener for Counter {
        async fn on_disconnected(&self, _client: &ReconnectingClient) {
            self.0.fetch_add(10, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_listeners_count_across_sets() {
        let listeners = Listeners::new();
        assert!(listeners.is_empty());

        let counter = Arc::new(Counter(AtomicU32::new(0)));
        listeners.connected.add(counter.clone());
        listeners.disconnected.add(counter.clone());
        // Same listener twice in one set is still one registration
        listeners.connected.add(counter);

        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_every_kind_has_its_own_queue() {
        let events = [
            ClientEvent::Connected,
            ClientEvent::Disconnected,
            ClientEvent::StatusChanged(Arc::new(Status::default())),
            ClientEvent::PlaylistChanged(Arc::new(Playlist::default())),
            ClientEvent::CurrentSongChanged(Arc::new(CurrentSong::default())),
            ClientEvent::SubsystemsChanged(Vec::new()),
        ];
        let mut slots: Vec<usize> = events.iter().map(ClientEvent::slot).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots, (0..KIND_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_event_kind_names() {
        assert_eq!(ClientEvent::Connected.kind(), "connected");
        assert_eq!(
            ClientEvent::SubsystemsChanged(vec![Subsystem::Mixer]).kind(),
            "subsystems_changed"
        );
    }
}
