//! Main RestClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::transport::QueryParams;
use crate::transport::Transport;

/// Per-request timeout applied unless the builder overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON REST client backing the table components.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use datatable_lib::{RestClient, auth::StaticTokenProvider};
///
/// let client = RestClient::builder()
///     .url("https://api.example.com/v1")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
///
/// let body = client.get("/users", &QueryParams::new().with("page", 1)).await?;
/// ```
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl RestClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RestClientBuilder<Missing> {
        RestClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the per-request timeout, if one is applied.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// Builds the absolute URL for a resource path plus query parameters.
    pub fn url_for(&self, path: &str, params: Option<&QueryParams>) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))?;

        if let Some(params) = params {
            let pairs = params.to_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url_for(path, params)?;
        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");

        if let Some(provider) = &self.inner.token_provider {
            let token = provider.get_token(&self.inner.base_url).await?;
            request = request.bearer_auth(&token.access_token);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.send_error(e))?;

        if !status.is_success() {
            log::warn!("{} {} failed with HTTP {}", method, url, status.as_u16());
            return Err(ApiError::from_body(status.as_u16(), text).into());
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        match serde_json::from_str(&text) {
            Ok(json) => Ok(json),
            Err(e) => Err(ApiError::parse_with_body(e.to_string(), text).into()),
        }
    }

    fn send_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.inner.timeout.unwrap_or(DEFAULT_TIMEOUT))
        } else {
            ApiError::Network(err)
        }
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<serde_json::Value, Error> {
        self.send(Method::GET, path, Some(params), None).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error> {
        self.send(Method::POST, path, None, Some(body)).await
    }

    async fn put(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error> {
        self.send(Method::PUT, path, None, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<serde_json::Value, Error> {
        self.send(Method::DELETE, path, None, None).await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`RestClient`].
///
/// Uses the typestate pattern to ensure the base URL is set at compile time.
///
/// # Example
///
/// ```ignore
/// let client = RestClient::builder()
///     .url("https://api.example.com/v1")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub struct RestClientBuilder<U> {
    url: U,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl RestClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: None,
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> RestClientBuilder<Set<String>> {
        RestClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for RestClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> RestClientBuilder<U> {
    /// Sets the token provider; requests then carry a bearer token.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the request timeout.
    ///
    /// Defaults to [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
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
}

impl RestClientBuilder<Set<String>> {
    /// Builds the [`RestClient`].
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn build(self) -> Result<RestClient, ApiError> {
        let base_url = self.url.0;
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RestClient {
            inner: Arc::new(RestClientInner {
                base_url,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_and_encodes() {
        let client = RestClient::builder()
            .url("https://api.example.com/v1/")
            .build()
            .unwrap();

        let params = QueryParams::new().with("page", 2).with("q", "a b");
        let url = client.url_for("/users", Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users?page=2&q=a+b");

        let bare = client.url_for("users", Some(&QueryParams::new())).unwrap();
        assert_eq!(bare.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let result = RestClient::builder().url("not a url").build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_default_timeout() {
        let client = RestClient::builder().url("http://localhost").build().unwrap();
        assert_eq!(client.timeout(), Some(DEFAULT_TIMEOUT));

        let client = RestClient::builder()
            .url("http://localhost")
            .no_timeout()
            .build()
            .unwrap();
        assert_eq!(client.timeout(), None);
    }
}
