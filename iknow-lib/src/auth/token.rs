//! TokenProvider trait and AccessToken

use async_trait::async_trait;

use crate::error::AuthError;

/// A bearer token issued by the IKnow backend at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Trait for providing access tokens to the IKnow client.
///
/// The client calls `get_token` before each API request. `Ok(None)` means the
/// user is anonymous and the request goes out without an `Authorization`
/// header.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use iknow_lib::auth::{AccessToken, TokenProvider};
/// use iknow_lib::error::AuthError;
///
/// struct SessionToken(std::sync::RwLock<Option<AccessToken>>);
///
/// #[async_trait]
/// impl TokenProvider for SessionToken {
///     async fn get_token(&self) -> Result<Option<AccessToken>, AuthError> {
///         Ok(self.0.read().unwrap().clone())
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets the current access token, if the user has one.
    async fn get_token(&self) -> Result<Option<AccessToken>, AuthError>;
}

/// A token provider that always returns the same static token.
///
/// # Example
///
/// ```
/// use iknow_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<Option<AccessToken>, AuthError> {
        Ok(Some(self.token.clone()))
    }
}

/// Token provider for anonymous access.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

#[async_trait]
impl TokenProvider for NoToken {
    async fn get_token(&self) -> Result<Option<AccessToken>, AuthError> {
        Ok(None)
    }
}
