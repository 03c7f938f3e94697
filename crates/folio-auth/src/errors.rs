//! Auth error types.

/// Errors that can occur while persisting the session token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// File I/O error.
    #[error("token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
