//! Endpoint identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport kind plus endpoint string, e.g. `("tcp", "localhost:6600")`
///
/// Used as the identity key of a cached client, so two values are the same
/// endpoint exactly when both parts compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetAddr {
    pub network: String,
    pub address: String,
}

impl NetAddr {
    pub fn new(network: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
        }
    }

    /// TCP endpoint, `host:port`
    pub fn tcp(address: impl Into<String>) -> Self {
        Self::new("tcp", address)
    }

    /// Unix domain socket path
    pub fn unix(path: impl Into<String>) -> Self {
        Self::new("unix", path)
    }
}

impl fmt::Display for NetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.network, self.address)
    }
}
