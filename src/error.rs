use thiserror::Error;

/// Errors raised by the host-protocol client
#[derive(Debug, Error)]
pub enum AdbError {
    /// Could not talk to the daemon: refused, broken or timed out
    #[error("ADB connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The daemon answered FAIL; the message is passed through verbatim
    #[error("{0}")]
    Protocol(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The daemon could not reach a TCP device
    #[error("Cannot reach remote device {address}: {message}")]
    RemoteConnection { address: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AdbError {
    /// True when the failure happened below the protocol, on the socket
    pub fn is_io(&self) -> bool {
        matches!(self, AdbError::Io(_))
    }

    /// True when the daemon explicitly rejected the request
    pub fn is_protocol(&self) -> bool {
        matches!(self, AdbError::Protocol(_))
    }

    /// Daemon-supplied text of a FAIL response
    pub fn protocol_message(&self) -> Option<&str> {
        match self {
            AdbError::Protocol(msg) => Some(msg),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdbError>;
