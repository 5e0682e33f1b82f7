use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the server
#[derive(Error, Debug)]
pub enum ServerError {
    /// The peer closed the stream early or broke the request framing
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No route matched the request path
    #[error("No handler for path: {0}")]
    HandlerNotFound(String),

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The response could not be written back to the peer
    #[error("Write failure: {0}")]
    WriteFailure(#[source] io::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
