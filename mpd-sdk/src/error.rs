use mpd_protocol::ProtocolError;
use thiserror::Error;

/// Errors surfaced by the reconnecting client and the client cache
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not connected")]
    NotConnected,

    #[error("Failed to connect")]
    DialFailed(#[source] ProtocolError),

    #[error("Command failed")]
    CommandFailed(#[source] ProtocolError),

    #[error("Unexpected response to '{command}': expected {expected} record(s), got {actual}")]
    UnexpectedResponseShape {
        command: String,
        expected: usize,
        actual: usize,
    },

    #[error("Client has been closed")]
    Closed,

    #[error("Invalid client options: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether retrying on a fresh connection could succeed
    pub fn is_connection_error(&self) -> bool {
        match self {
            ClientError::NotConnected | ClientError::DialFailed(_) => true,
            ClientError::CommandFailed(e) => {
                matches!(e, ProtocolError::Io(_) | ProtocolError::Closed)
            }
            _ => false,
        }
    }
}

impl From<ProtocolError> for ClientError {
    fn from(error: ProtocolError) -> Self {
        match error {
            ProtocolError::UnexpectedResponseShape {
                command,
                expected,
                actual,
            } => ClientError::UnexpectedResponseShape {
                command,
                expected,
                actual,
            },
            other => ClientError::CommandFailed(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_shape_error_keeps_its_kind() {
        let error = ClientError::from(ProtocolError::UnexpectedResponseShape {
            command: "status".to_string(),
            expected: 1,
            actual: 0,
        });
        assert!(matches!(
            error,
            ClientError::UnexpectedResponseShape { expected: 1, actual: 0, .. }
        ));
        assert!(!error.is_connection_error());
    }

    #[test]
    fn test_io_error_is_a_connection_error() {
        let error = ClientError::from(ProtocolError::Io("broken pipe".to_string()));
        assert!(matches!(error, ClientError::CommandFailed(_)));
        assert!(error.is_connection_error());

        let error = ClientError::from(ProtocolError::Server {
            code: 5,
            command: "bogus".to_string(),
            message: "unknown command".to_string(),
        });
        assert!(!error.is_connection_error());
    }

    #[test]
    fn test_wrapped_message_appears_once_in_chain() {
        let error = ClientError::DialFailed(ProtocolError::Io("connection refused".to_string()));
        assert_eq!(error.to_string(), "Failed to connect");

        let source = error.source().expect("dial error keeps its cause");
        assert!(source.to_string().contains("connection refused"));

        let error = ClientError::from(ProtocolError::Closed);
        assert_eq!(error.to_string(), "Command failed");
        assert!(error.source().is_some());
    }
}
