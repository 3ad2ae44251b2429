//! HTTP transport seam
//!
//! Everything that talks to the network goes through [`Transport`]. The
//! crate ships [`RestClient`](crate::RestClient) as the reqwest-backed
//! implementation; hosts and tests can plug in their own.

#[cfg(test)]
pub(crate) mod fake;
mod params;

pub use params::QueryParams;

use async_trait::async_trait;

use crate::error::Error;

/// Minimal JSON-over-HTTP client the table components depend on.
///
/// Paths are relative to whatever base the implementation is configured
/// with. Every method resolves to the decoded JSON body of a successful
/// response; non-success responses become [`ApiError::Http`](crate::error::ApiError::Http)
/// carrying the body's `message` when it has one.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path?params`.
    async fn get(&self, path: &str, params: &QueryParams) -> Result<serde_json::Value, Error>;

    /// `POST path` with a JSON body.
    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error>;

    /// `PUT path` with a JSON body.
    async fn put(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error>;

    /// `DELETE path`.
    async fn delete(&self, path: &str) -> Result<serde_json::Value, Error>;
}
