//! Error types for the Stickies core library.

use thiserror::Error;

/// All errors that can occur within the Stickies core library.
#[derive(Debug, Error)]
pub enum StickiesError {
    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The windowing toolkit rejected a request.
    #[error("Window error: {0}")]
    Host(String),

    /// A window label was used that has no live window behind it.
    #[error("Window not found: {0}")]
    WindowNotFound(String),
}

/// Convenience alias that pins the error type to [`StickiesError`].
pub type Result<T> = std::result::Result<T, StickiesError>;

impl StickiesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Host(msg) => format!("Window error: {msg}"),
            Self::WindowNotFound(_) => "Note window no longer exists".to_string(),
        }
    }
}
