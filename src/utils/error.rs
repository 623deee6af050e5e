//! Error handling module
//!
//! Defines the error types produced while talking to the completion API

use std::error::Error as StdError;
use thiserror::Error;

/// Symbolic code for a failed DNS lookup
pub const ENOTFOUND: &str = "ENOTFOUND";

/// Symbolic code for a connection the remote host refused
pub const ECONNREFUSED: &str = "ECONNREFUSED";

/// Errors returned by a completion provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("{status} {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The connection could not be established
    #[error("Connection error.")]
    Connection {
        code: Option<String>,
        detail: String,
    },

    /// The request did not complete in time
    #[error("Request timed out.")]
    Timeout(String),

    /// Any other transport failure
    #[error("{detail}")]
    Transport {
        code: Option<String>,
        detail: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The server reported an error inside the event stream
    #[error("Stream error: {message}")]
    Stream {
        message: String,
        code: Option<String>,
    },

    /// HTTP client construction failed
    #[error("Failed to create HTTP client: {0}")]
    Setup(String),
}

impl ClientError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Symbolic error code carried by the error, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. }
            | ClientError::Connection { code, .. }
            | ClientError::Transport { code, .. }
            | ClientError::Stream { code, .. } => code.as_deref(),
            ClientError::Timeout(_) | ClientError::Decode(_) | ClientError::Setup(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        let detail = error_chain(&error);
        let code = transport_code(&error).map(str::to_string);

        if error.is_timeout() {
            ClientError::Timeout(detail)
        } else if error.is_connect() {
            ClientError::Connection { code, detail }
        } else if error.is_decode() {
            ClientError::Decode(detail)
        } else if error.is_builder() {
            ClientError::Setup(detail)
        } else {
            ClientError::Transport { code, detail }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode(error.to_string())
    }
}

/// Errors that end a demo run early
#[derive(Error, Debug)]
pub enum RunError {
    /// The provider failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing to the console failed
    #[error("Console write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Render an error together with its sources, outermost first
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut current = error.source();

    while let Some(source) = current {
        let text = source.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        current = source.source();
    }

    rendered
}

/// Recover a symbolic transport code by walking the error's source chain
pub fn transport_code(error: &(dyn StdError + 'static)) -> Option<&'static str> {
    let mut current = Some(error);

    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::ConnectionRefused {
                return Some(ECONNREFUSED);
            }
        }

        let text = err.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some(ENOTFOUND);
        }
        if text.contains("connection refused") {
            return Some(ECONNREFUSED);
        }

        current = err.source();
    }

    None
}
