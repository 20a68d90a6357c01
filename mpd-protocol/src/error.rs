//! Error types for the protocol boundary

use thiserror::Error;

use crate::addr::NetAddr;

/// Errors reported by a `Dialer` or `Connection`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The endpoint could not be reached
    #[error("Failed to dial {addr}: {message}")]
    Dial { addr: NetAddr, message: String },

    /// The server rejected the password
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport failure on an established connection
    #[error("I/O error: {0}")]
    Io(String),

    /// The server answered with an ACK
    #[error("Server error {code} in {command}: {message}")]
    Server {
        code: u32,
        command: String,
        message: String,
    },

    /// The reply did not have the number of records the command implies
    #[error("Unexpected response to {command}: expected {expected} record(s), got {actual}")]
    UnexpectedResponseShape {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// The connection was already closed
    #[error("Connection closed")]
    Closed,
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProtocolError::Dial {
            addr: NetAddr::tcp("localhost:6600"),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to dial tcp://localhost:6600: connection refused"
        );

        let error = ProtocolError::UnexpectedResponseShape {
            command: "status".to_string(),
            expected: 1,
            actual: 0,
        };
        assert!(error.to_string().contains("expected 1 record(s), got 0"));

        let error = ProtocolError::Server {
            code: 50,
            command: "play".to_string(),
            message: "No such song".to_string(),
        };
        assert_eq!(error.to_string(), "Server error 50 in play: No such song");
    }
}
