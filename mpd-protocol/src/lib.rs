//! Protocol boundary for talking to a music player daemon
//!
//! This crate does not speak the wire protocol itself. It fixes the shape of
//! the collaborator that does: a `Dialer` that opens authenticated sessions
//! and a `Connection` that issues commands and returns `Attrs` records.
//! The reconnecting client in `mpd-sdk` is written purely against these
//! traits.
//!
//! ```rust,ignore
//! use mpd_protocol::{Connection, Dialer, NetAddr};
//!
//! let conn = dialer.dial(&NetAddr::tcp("localhost:6600"), None).await?;
//! let status = conn.status().await?;
//! println!("state = {:?}", status.get("state"));
//! conn.close().await?;
//! ```
//!
//! With the `test-support` feature the `mock` module provides `MockServer`,
//! a scripted in-memory daemon with failure toggles.

pub mod addr;
pub mod attrs;
pub mod command;
pub mod connection;
pub mod error;
pub mod subsystem;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use addr::NetAddr;
pub use attrs::Attrs;
pub use command::{Command, PlaylistRange};
pub use connection::{changed_subsystems, Connection, Dialer};
pub use error::{ProtocolError, Result};
pub use subsystem::{Subsystem, UnknownSubsystem};
