//! Authentication error types

/// Errors that can occur while obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Reading the token store failed.
    #[error("Token store error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored token could not be parsed.
    #[error("Token parse error: {0}")]
    Parse(String),
}
