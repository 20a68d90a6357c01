//! Process-wide cache of reconnecting clients, one per address
//!
//! Concurrent `get_or_create` calls for the same address share one client:
//! the first caller creates it under the write lock, everyone else finds it
//! under the read lock.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use mpd_protocol::{Dialer, NetAddr};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::ReconnectingClient;
use crate::config::ClientOptions;
use crate::error::Result;

/// A cached client together with the key and options it was created with
pub struct ClientCacheEntry {
    addr: NetAddr,
    options: ClientOptions,
    client: ReconnectingClient,
}

impl ClientCacheEntry {
    pub fn addr(&self) -> &NetAddr {
        &self.addr
    }

    /// Options the client was created with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn client(&self) -> &ReconnectingClient {
        &self.client
    }
}

impl Deref for ClientCacheEntry {
    type Target = ReconnectingClient;

    fn deref(&self) -> &ReconnectingClient {
        &self.client
    }
}

impl fmt::Debug for ClientCacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCacheEntry")
            .field("addr", &self.addr)
            .field("state", &self.client.state())
            .finish()
    }
}

/// Map from address to shared client
pub struct ClientCache {
    dialer: Arc<dyn Dialer>,
    entries: RwLock<HashMap<NetAddr, Arc<ClientCacheEntry>>>,
}

impl ClientCache {
    /// Create an empty cache whose clients dial through `dialer`
    pub fn new(dialer: Arc<dyn Dialer>) -> Self {
        Self {
            dialer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the client for `network`/`address`, creating it on first use
    ///
    /// At most one client is ever created per address. `options` only apply
    /// when this call creates the client; an existing entry keeps its own.
    ///
    /// # Arguments
    /// * `network` - Transport, `tcp` or `unix`
    /// * `address` - `host:port` or a socket path
    /// * `options` - Options for a newly created client
    ///
    /// # Returns
    /// * `Ok(entry)` - The existing or newly created entry
    /// * `Err(ClientError)` - Invalid options, or the first dial failed with
    ///   `options.blocking` set; nothing is cached in that case
    pub async fn get_or_create(
        &self,
        network: &str,
        address: &str,
        options: ClientOptions,
    ) -> Result<Arc<ClientCacheEntry>> {
        let addr = NetAddr::new(network, address);

        // First check under the read lock
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&addr) {
                return Ok(Arc::clone(entry));
            }
        }

        let mut entries = self.entries.write().await;

        // Another caller may have created it while we waited for the write lock
        if let Some(entry) = entries.get(&addr) {
            debug!(addr = %addr, "client created concurrently");
            return Ok(Arc::clone(entry));
        }

        let client =
            ReconnectingClient::open(addr.clone(), Arc::clone(&self.dialer), options.clone())
                .await?;
        let entry = Arc::new(ClientCacheEntry {
            addr: addr.clone(),
            options,
            client,
        });
        entries.insert(addr.clone(), Arc::clone(&entry));
        info!(addr = %addr, clients = entries.len(), "client cached");

        Ok(entry)
    }

    /// Look up an existing entry without creating one
    pub async fn get(&self, network: &str, address: &str) -> Option<Arc<ClientCacheEntry>> {
        let addr = NetAddr::new(network, address);
        self.entries.read().await.get(&addr).cloned()
    }

    pub async fn contains(&self, network: &str, address: &str) -> bool {
        self.get(network, address).await.is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Close every cached client and empty the cache
    ///
    /// Close errors are logged, never returned. Handles obtained earlier stay
    /// usable as closed clients.
    pub async fn shutdown(&self) {
        let mut entries = self.entries.write().await;
        info!(clients = entries.len(), "shutting down client cache");

        for (addr, entry) in entries.drain() {
            if let Err(e) = entry.client.close().await {
                warn!(
                    addr = %addr,
                    error = &e as &dyn std::error::Error,
                    "error closing cached client"
                );
            }
        }
    }
}

impl fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache").finish_non_exhaustive()
    }
}
