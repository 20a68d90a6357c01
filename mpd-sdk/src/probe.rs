//! Keepalive probes
//!
//! A probe runs on every keepalive tick while the client holds its shared
//! connection hold. An error from the probe counts as a broken connection and
//! starts a reconnect cycle.
//!
//! Probes see the client only through a `ProbeContext`, which exposes what is
//! safe to use under the hold. Commands go straight to the connection handed
//! to the probe.

use std::sync::Arc;

use async_trait::async_trait;
use mpd_protocol::{Connection, NetAddr};
use mpd_state::Status;

use crate::client::{ConnectionState, ReconnectingClient};
use crate::error::Result;

/// The part of a client a keepalive probe may use
pub struct ProbeContext<'a> {
    client: &'a ReconnectingClient,
}

impl<'a> ProbeContext<'a> {
    pub(crate) fn new(client: &'a ReconnectingClient) -> Self {
        Self { client }
    }

    pub fn addr(&self) -> &NetAddr {
        self.client.addr()
    }

    pub fn state(&self) -> ConnectionState {
        self.client.state()
    }

    /// Status snapshot from the last completed refresh
    pub fn status(&self) -> Option<Arc<Status>> {
        self.client.status()
    }

    /// Refresh the snapshot cache over `connection`, publishing what changed
    pub async fn refresh(&self, connection: &dyn Connection) -> Result<()> {
        self.client.refresh_with(connection).await
    }
}

#[async_trait]
pub trait KeepaliveProbe: Send + Sync {
    /// Check the live connection
    ///
    /// `connection` is only valid for the duration of the call.
    async fn probe(&self, ctx: &ProbeContext<'_>, connection: &dyn Connection) -> Result<()>;
}

/// Default probe: refresh the snapshot cache
///
/// The `status` fetch doubles as the liveness check, so an idle client still
/// notices changes made by other clients once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshProbe;

#[async_trait]
impl KeepaliveProbe for RefreshProbe {
    async fn probe(&self, ctx: &ProbeContext<'_>, connection: &dyn Connection) -> Result<()> {
        ctx.refresh(connection).await
    }
}

/// Liveness-only probe sending `ping`
#[derive(Debug, Clone, Copy, Default)]
pub struct PingProbe;

#[async_trait]
impl KeepaliveProbe for PingProbe {
    async fn probe(&self, _ctx: &ProbeContext<'_>, connection: &dyn Connection) -> Result<()> {
        connection.ping().await?;
        Ok(())
    }
}
