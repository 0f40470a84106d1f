use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Main error type for turntop
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A frame could not be parsed as a snapshot
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The live channel failed at the websocket level
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// The termination request could not be sent or was rejected
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] reqwest::Error),

    /// The server address cannot be used for the live channel or actions
    #[error("Invalid endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },

    /// Terminal initialization or operation failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Configuration or arguments are invalid
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ConsoleError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        ConsoleError::Decode {
            message: message.into(),
        }
    }

    /// Create an endpoint error
    pub fn endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ConsoleError::Endpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ConsoleError::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode {
            message: err.to_string(),
        }
    }
}

/// Result type alias for turntop operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
