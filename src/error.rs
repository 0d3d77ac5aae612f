use thiserror::Error;

/// Unified error type for release-notes-sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tag format: {0}")]
    InvalidTag(String),

    #[error("Remote API error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Release notes file not found: {0}")]
    NotesMissing(String),

    #[error("Target file missing: {0}")]
    FileMissing(String),

    #[error("No release tag found")]
    NoReleaseTag,

    #[error("Transform service error: {0}")]
    Transform(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-notes-sync
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SyncError::Config(msg.into())
    }

    /// Create an invalid-tag error with context
    pub fn invalid_tag(msg: impl Into<String>) -> Self {
        SyncError::InvalidTag(msg.into())
    }

    /// Create a remote API error carrying the response status and body
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        SyncError::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a transform-service error with context
    pub fn transform(msg: impl Into<String>) -> Self {
        SyncError::Transform(msg.into())
    }

    /// True when the error represents a remote 404 response
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, SyncError::Remote { status: 404, .. })
    }
}
