//! Per-session keepalive task
//!
//! Each connected session owns one task. On every tick it first wakes any
//! pending `idle`, then runs the client's probe under the shared hold. When
//! the probe fails the task releases the hold, runs one reconnect cycle
//! itself and exits; the new session starts a task of its own. The task
//! holds only a weak reference, so it also ends once every client handle is
//! gone.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use super::{signalled, Inner, ReconnectingClient};
use crate::error::Result;
use crate::probe::ProbeContext;

/// Start the keepalive task for a new session, returning its stop signal
pub(super) fn spawn(client: &ReconnectingClient) -> watch::Sender<bool> {
    let (stop_tx, stop_rx) = watch::channel(false);
    let period = client.inner.options.keepalive_interval;
    tokio::spawn(run(Arc::downgrade(&client.inner), stop_rx, period));
    stop_tx
}

async fn run(inner: Weak<Inner>, mut stop: watch::Receiver<bool>, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = signalled(&mut stop) => {
                debug!("keepalive stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        let Some(inner) = inner.upgrade() else {
            return;
        };
        let client = ReconnectingClient { inner };

        match client.probe_once(&stop).await {
            Ok(true) => trace!(addr = %client.addr(), "keepalive probe ok"),
            Ok(false) => return,
            Err(e) => {
                warn!(
                    addr = %client.addr(),
                    error = &e as &dyn std::error::Error,
                    "keepalive probe failed"
                );
                client.reconnect().await;
                return;
            }
        }
    }
}

impl ReconnectingClient {
    /// Run the probe once; `Ok(false)` when this session is already gone
    async fn probe_once(&self, stop: &watch::Receiver<bool>) -> Result<bool> {
        let _blocker = self.block_idle();
        let guard = self.inner.session.read().await;
        if *stop.borrow() {
            return Ok(false);
        }
        let Some(session) = guard.as_ref() else {
            return Ok(false);
        };

        self.inner
            .probe
            .probe(&ProbeContext::new(self), session.connection.as_ref())
            .await?;
        Ok(true)
    }
}
