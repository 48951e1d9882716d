//! Error types for PowerDNS operations.

use std::fmt;

/// Result type alias for PowerDNS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of PowerDNS errors for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// API unreachable or returned a server error.
    Network,
    /// API key missing or invalid.
    Auth,
    /// Zone does not exist.
    NotFound,
    /// Request rejected or response malformed.
    Format,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "PowerDNS API is unreachable",
            Self::Auth => "PowerDNS rejected the API key",
            Self::NotFound => "Zone not found in PowerDNS",
            Self::Format => "PowerDNS rejected the request",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the PowerDNS API URL and that the webserver is enabled",
            Self::Auth => "Check the PowerDNS API key",
            Self::NotFound => "Create the zone in PowerDNS first",
            Self::Format => "Check the record names and types for this zone",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to PowerDNS.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed or returned an error status.
    #[error("PowerDNS request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Zone targeted by a change does not exist.
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    /// Response could not be decoded.
    #[error("invalid PowerDNS response: {0}")]
    InvalidResponse(String),
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
                status: Some(400 | 422),
                ..
            } => ErrorCategory::Format,
            Error::Http { .. } => ErrorCategory::Network,
            Error::ZoneNotFound(_) => ErrorCategory::NotFound,
            Error::InvalidResponse(_) => ErrorCategory::Format,
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
