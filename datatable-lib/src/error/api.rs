//! API error types

use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if the body carried one.
        message: Option<String>,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: Some(message.into()),
            body: None,
        }
    }

    /// Creates an HTTP error from a raw response body.
    ///
    /// A JSON body of the form `{"message": "..."}` supplies the message;
    /// anything else is kept only as the raw body.
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.is_empty());

        Self::Http {
            status,
            message,
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-supplied message if this is an HTTP error that had one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_with_message() {
        let err = ApiError::from_body(422, r#"{"message": "Invalid filter"}"#);
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.server_message(), Some("Invalid filter"));
        assert_eq!(err.to_string(), "HTTP 422: Invalid filter");
    }

    #[test]
    fn test_from_body_without_message() {
        let err = ApiError::from_body(500, "<html>oops</html>");
        assert_eq!(err.server_message(), None);
        assert!(err.is_retryable());
        assert!(matches!(err, ApiError::Http { body: Some(_), .. }));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = crate::error::Error::from(ApiError::from_body(404, "{}"));
        assert_eq!(err.user_message("Failed to fetch data"), "Failed to fetch data");
        assert!(!err.is_unauthorized());

        let err = crate::error::Error::from(ApiError::http(403, "Forbidden"));
        assert_eq!(err.user_message("Failed to fetch data"), "Forbidden");
        assert!(err.is_unauthorized());
    }
}
