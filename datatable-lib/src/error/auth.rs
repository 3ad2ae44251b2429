//! Authentication error types

/// Errors a [`TokenProvider`](crate::auth::TokenProvider) can report.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token is available (not signed in, or the session ended).
    #[error("No access token available")]
    NoToken,

    /// Access token expired and refresh failed.
    #[error("Token expired and refresh failed: {message}")]
    TokenExpired { message: String },

    /// The host application's credential source failed.
    #[error("Token provider failed: {0}")]
    Provider(String),
}
