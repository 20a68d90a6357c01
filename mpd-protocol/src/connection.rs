//! Dialer and connection traits
//!
//! The wire codec lives behind these two traits. Everything above them only
//! sees `Attrs` records and typed errors.

use async_trait::async_trait;
use tracing::trace;

use crate::addr::NetAddr;
use crate::attrs::Attrs;
use crate::command::{Command, PlaylistRange};
use crate::error::{ProtocolError, Result};
use crate::subsystem::Subsystem;

/// Opens authenticated connections to a server
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Connect to `addr`, sending `password` first when one is given
    async fn dial(&self, addr: &NetAddr, password: Option<&str>) -> Result<Box<dyn Connection>>;
}

/// One live protocol session
///
/// Implementations serialize commands internally; callers may share a
/// `&dyn Connection` between tasks but commands are never multiplexed. The
/// one exception is `no_idle`, which must go out while an `idle` is pending.
/// Only `issue` and `close` are required, the typed helpers are built on
/// `issue` and check the reply shape.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Send one command and collect the reply records
    async fn issue(&self, command: &Command) -> Result<Vec<Attrs>>;

    /// Close the session. Further commands fail with `ProtocolError::Closed`.
    async fn close(&self) -> Result<()>;

    /// `status`, which must answer with exactly one record
    async fn status(&self) -> Result<Attrs> {
        let command = Command::status();
        let records = self.issue(&command).await?;
        match <[Attrs; 1]>::try_from(records) {
            Ok([record]) => Ok(record),
            Err(records) => Err(ProtocolError::UnexpectedResponseShape {
                command: command.name,
                expected: 1,
                actual: records.len(),
            }),
        }
    }

    /// `playlistinfo`, one record per queue entry
    ///
    /// A bounded range may come back short near the end of the queue, but
    /// never with more records than it spans.
    async fn playlist_info(&self, range: Option<PlaylistRange>) -> Result<Vec<Attrs>> {
        let command = Command::playlist_info(range);
        let records = self.issue(&command).await?;
        if let Some(range) = range {
            if records.len() > range.len() {
                return Err(ProtocolError::UnexpectedResponseShape {
                    command: command.to_string(),
                    expected: range.len(),
                    actual: records.len(),
                });
            }
        }
        trace!(count = records.len(), "playlistinfo");
        Ok(records)
    }

    /// Liveness probe
    async fn ping(&self) -> Result<()> {
        self.issue(&Command::ping()).await.map(|_| ())
    }

    /// Block until one of `subsystems` (or any, if empty) changes
    async fn idle(&self, subsystems: &[Subsystem]) -> Result<Vec<Subsystem>> {
        let records = self.issue(&Command::idle(subsystems)).await?;
        Ok(changed_subsystems(&records))
    }

    /// Interrupt a pending `idle`, returning whatever it had collected
    async fn no_idle(&self) -> Result<Vec<Subsystem>> {
        let records = self.issue(&Command::no_idle()).await?;
        Ok(changed_subsystems(&records))
    }
}

/// Collect the `changed:` lines of an idle reply, skipping names this
/// library does not know yet
pub fn changed_subsystems(records: &[Attrs]) -> Vec<Subsystem> {
    let mut changed = Vec::new();
    for name in records.iter().flat_map(|r| r.get_all("changed")) {
        match name.parse::<Subsystem>() {
            Ok(subsystem) if !changed.contains(&subsystem) => changed.push(subsystem),
            Ok(_) => {}
            Err(e) => trace!(error = %e, "ignoring subsystem"),
        }
    }
    changed
}
