//! Error types for the SmallTalk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] is what a turn
//! returns to the boundary layer.

use thiserror::Error;

/// The top-level error type for a conversational turn.
///
/// Every variant is transparent: the message the boundary layer shows is
/// exactly the message of the underlying error.
#[derive(Debug, Error)]
pub enum Error {
    // --- Command routing ---
    #[error(transparent)]
    Command(#[from] CommandError),

    // --- Collaborators ---
    #[error(transparent)]
    Reply(#[from] ReplyError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl Error {
    /// Whether this error was caused by the caller's input rather than a
    /// failing collaborator.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A slash command outside the supported vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Carries the trimmed input exactly as the user sent it.
    #[error("Command {0} is not supported")]
    Unsupported(String),
}

#[derive(Debug, Clone, Error)]
pub enum ReplyError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by reply backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Reply backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Reply backend returned no text")]
    EmptyReply,

    #[error("Cannot reply to an empty context")]
    EmptyContext,
}

#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    #[error("Failed to read profiles from {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("No profiles found in {0}")]
    Empty(String),

    #[error("Profile generation failed: {0}")]
    Generation(String),
}
