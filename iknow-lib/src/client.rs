//! Main IKnowClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::PagingPolicy;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// The client for the IKnow REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use iknow_lib::{IKnowClient, auth::StaticTokenProvider};
///
/// let client = IKnowClient::builder()
///     .url("https://api.iknow.example")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
///
/// let universities = client.universities().await?;
/// ```
#[derive(Clone)]
pub struct IKnowClient {
    inner: Arc<IKnowClientInner>,
}

struct IKnowClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
    paging_policy: PagingPolicy,
}

impl IKnowClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> IKnowClientBuilder<Missing, Missing> {
        IKnowClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns how multi-page listings decide whether to continue.
    pub fn paging_policy(&self) -> PagingPolicy {
        self.inner.paging_policy
    }

    /// Builds the absolute URL for an API path with query parameters.
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, Error> {
        let raw = format!("{}{}", self.inner.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.send_json(Method::GET, url, None).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_string(body).map_err(Error::Serialization)?;
        self.send_json(Method::POST, url, Some(body)).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<T, Error> {
        log::debug!("{} {}", method, url);

        let token = self.inner.token_provider.get_token().await?;

        let mut request = self.inner.http_client.request(method, url);

        if let Some(token) = token {
            request = request.bearer_auth(&token.access_token);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), text).into());
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), text).into())
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`IKnowClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The API base URL
/// - `token_provider` - A [`TokenProvider`] implementation
///
/// # Example
///
/// ```ignore
/// let client = IKnowClient::builder()
///     .url("https://api.iknow.example")
///     .token_provider(NoToken)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct IKnowClientBuilder<U, P> {
    url: U,
    token_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    paging_policy: PagingPolicy,
}

impl IKnowClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            paging_policy: PagingPolicy::default(),
        }
    }
}

impl Default for IKnowClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> IKnowClientBuilder<Missing, P> {
    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> IKnowClientBuilder<Set<String>, P> {
        IKnowClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            paging_policy: self.paging_policy,
        }
    }
}

impl<U> IKnowClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> IKnowClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        self.shared_token_provider(Arc::new(provider))
    }

    /// Sets an already shared token provider.
    pub fn shared_token_provider(
        self,
        provider: Arc<dyn TokenProvider>,
    ) -> IKnowClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        IKnowClientBuilder {
            url: self.url,
            token_provider: Set(provider),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            paging_policy: self.paging_policy,
        }
    }
}

impl<U, P> IKnowClientBuilder<U, P> {
    /// Sets the request timeout. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets how paged listings decide to fetch another page when the server
    /// sends no explicit signal. Defaults to [`PagingPolicy::ExplicitOnly`].
    pub fn paging_policy(mut self, policy: PagingPolicy) -> Self {
        self.paging_policy = policy;
        self
    }
}

impl IKnowClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`IKnowClient`].
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn build(self) -> Result<IKnowClient, Error> {
        let base_url = self.url.0.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(IKnowClient {
            inner: Arc::new(IKnowClientInner {
                base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
                paging_policy: self.paging_policy,
            }),
        })
    }
}
