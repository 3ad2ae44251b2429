//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// A bearer access token with optional expiration.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns the token as a bearer authorization header value.
    pub fn as_bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Supplies access tokens to the [`RestClient`](crate::RestClient).
///
/// The client calls `get_token` before each request. Implementations own
/// caching and refresh; an expired token is reported as
/// [`AuthError::TokenExpired`] rather than sent.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use datatable_lib::auth::{AccessToken, TokenProvider};
/// use datatable_lib::error::AuthError;
///
/// struct SessionTokens {
///     session: MySession,
/// }
///
/// #[async_trait]
/// impl TokenProvider for SessionTokens {
///     async fn get_token(&self, base_url: &str) -> Result<AccessToken, AuthError> {
///         self.session.current_token().ok_or(AuthError::NoToken)
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token for requests against `base_url`.
    async fn get_token(&self, base_url: &str) -> Result<AccessToken, AuthError>;
}

/// A simple token provider that always returns the same static token.
///
/// # Example
///
/// ```
/// use datatable_lib::auth::StaticTokenProvider;
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

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
        if self.token.is_expired() {
            return Err(AuthError::TokenExpired {
                message: "static token has no refresh".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_rejects_expired() {
        let expired = AccessToken::with_expiry("old", Utc::now() - chrono::Duration::minutes(5));
        let provider = StaticTokenProvider::from_token(expired);
        assert!(matches!(
            provider.get_token("https://api.example.com").await,
            Err(AuthError::TokenExpired { .. })
        ));

        let provider = StaticTokenProvider::new("fresh");
        let token = provider.get_token("https://api.example.com").await.unwrap();
        assert_eq!(token.as_bearer(), "Bearer fresh");
    }
}
