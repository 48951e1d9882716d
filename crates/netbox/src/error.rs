//! Error types for NetBox operations.
//!
//! Errors are categorized so callers can report what went wrong. None of
//! them are retried: an incomplete inventory read must abort the caller.

use std::fmt;

/// Result type alias for NetBox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of NetBox errors for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// NetBox unreachable or returned a server error.
    Network,
    /// Token missing, invalid, or lacking permissions.
    Auth,
    /// Endpoint or object not found.
    NotFound,
    /// Response body did not match the expected shape.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "NetBox is unreachable",
            Self::Auth => "NetBox rejected the API token",
            Self::NotFound => "NetBox endpoint not found",
            Self::Format => "Unexpected NetBox response",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the NetBox URL and that the service is up",
            Self::Auth => "Check the NetBox token and its read permissions",
            Self::NotFound => "Check the NetBox URL, it should not include /api",
            Self::Format => "Check that the NetBox version is supported",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while querying NetBox.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed or returned an error status.
    #[error("NetBox request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Response could not be decoded.
    #[error("invalid NetBox response: {0}")]
    InvalidResponse(String),

    /// Query could not be evaluated (bad filter value).
    #[error("invalid NetBox query: {0}")]
    InvalidQuery(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Auth,
            Error::Http {
                status: Some(404), ..
            } => ErrorCategory::NotFound,
            Error::Http { .. } => ErrorCategory::Network,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::InvalidQuery(_) => ErrorCategory::Other,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            ureq::Error::Json(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
