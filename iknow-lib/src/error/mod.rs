//! Error types

mod api;
mod auth;

pub use api::*;
pub use auth::*;

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Obtaining an access token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// The operation cannot be performed with the given input.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Returns the HTTP status code if the server answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}
