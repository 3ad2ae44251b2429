//! Error types

mod api;
mod auth;
mod field;

pub use api::*;
pub use auth::*;
pub use field::*;

/// Default text for the list error slot when the server gave no message.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch data";

/// Top-level error for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or HTTP failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token provider could not supply credentials.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A field of a response had an unexpected shape.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// Returns the message the server put in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.server_message(),
            _ => None,
        }
    }

    /// Returns the text shown in a list's error slot.
    ///
    /// This is the `message` from the error response body when present,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Returns `true` for 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }
}
