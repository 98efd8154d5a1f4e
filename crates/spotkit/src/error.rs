//! Error types for Spot API operations.
//!
//! Errors are categorized so callers can tell a missing resource apart from
//! a rejected request or a transport failure, and show the user advice that
//! fits.

use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for Spot API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error code the API returns when a stateful node id is unknown.
pub const NODE_NOT_FOUND_CODE: &str = "STATEFUL_NODE_DOES_NOT_EXIST";

/// Categories of Spot API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS or timeout failure.
    Network,
    /// The addressed resource does not exist.
    NotFound,
    /// Token missing, invalid or lacking permission.
    Auth,
    /// The API rejected the request.
    Rejected,
    /// Response body could not be understood.
    Format,
    /// Local configuration problem (credentials file, token).
    Config,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Resource not found",
            Self::Auth => "Authentication failed",
            Self::Rejected => "Request rejected by the API",
            Self::Format => "Unexpected API response",
            Self::Config => "Invalid client configuration",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again",
            Self::NotFound => "Verify the id, or let the resource be looked up by name",
            Self::Auth => "Check the token and account id in your credentials",
            Self::Rejected => "Fix the request fields named in the error message",
            Self::Format => "The API may have changed; check for a newer version",
            Self::Config => "Check the credentials file and environment variables",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Spot API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The API reported that the resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Error message from the API.
        message: String,
    },

    /// 401 or 403 from the API.
    #[error("unauthorized (HTTP {status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Any other non-success response.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error messages from the API, joined.
        message: String,
    },

    /// Response body did not match the expected envelope.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Local configuration problem.
    #[error("{0}")]
    Config(String),

    /// IO error while reading local files.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::Rejected { .. } => ErrorCategory::Rejected,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io { .. } => ErrorCategory::Other,
        }
    }

    /// Whether the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Create an error from a non-success API response.
    ///
    /// The body is expected to carry `response.errors[]` with `code` and
    /// `message`; anything else falls back to the raw body.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        let errors = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.response.errors)
            .unwrap_or_default();

        let message = if errors.is_empty() {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        } else {
            errors
                .iter()
                .map(ApiError::describe)
                .collect::<Vec<_>>()
                .join("; ")
        };

        let not_found = errors.iter().any(|e| e.code == NODE_NOT_FOUND_CODE);
        match status {
            _ if not_found => Error::NotFound { message },
            404 => Error::NotFound { message },
            401 | 403 => Error::Auth { status, message },
            _ => Error::Rejected { status, message },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    response: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    fn describe(&self) -> String {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => format!("{}: {}", self.code, self.message),
            (true, _) => self.message.clone(),
            (false, true) => self.code.clone(),
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Rejected {
                status: code,
                message: format!("HTTP {code}"),
            },
            other => Self::Network {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_by_code() {
        let body = r#"{"request":{"id":"r1"},"response":{"status":{"code":400},"errors":[{"code":"STATEFUL_NODE_DOES_NOT_EXIST","message":"Stateful node ssn-1 does not exist"}]}}"#;
        let err = Error::from_api_response(400, body);
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "STATEFUL_NODE_DOES_NOT_EXIST: Stateful node ssn-1 does not exist"
        );
    }

    #[test]
    fn test_not_found_by_status() {
        let err = Error::from_api_response(404, "");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn test_auth_errors() {
        let err = Error::from_api_response(401, r#"{"response":{"errors":[{"message":"Unauthorized"}]}}"#);
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(err.to_string(), "unauthorized (HTTP 401): Unauthorized");

        let err = Error::from_api_response(403, "forbidden");
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_rejected_joins_messages() {
        let body = r#"{"response":{"errors":[
            {"code":"VALIDATION_ERROR","message":"region is required"},
            {"code":"VALIDATION_ERROR","message":"vmSizes is required"}
        ]}}"#;
        let err = Error::from_api_response(400, body);
        assert_eq!(err.category(), ErrorCategory::Rejected);
        assert_eq!(
            err.to_string(),
            "VALIDATION_ERROR: region is required; VALIDATION_ERROR: vmSizes is required"
        );
    }

    #[test]
    fn test_non_json_body_passes_through() {
        let err = Error::from_api_response(502, "  Bad Gateway\n");
        assert!(matches!(err, Error::Rejected { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_category_advice_not_empty() {
        for category in [
            ErrorCategory::Network,
            ErrorCategory::NotFound,
            ErrorCategory::Auth,
            ErrorCategory::Rejected,
            ErrorCategory::Format,
            ErrorCategory::Config,
            ErrorCategory::Other,
        ] {
            assert!(!category.description().is_empty());
            assert!(!category.advice().is_empty());
        }
    }

    #[test]
    fn test_error_category_display() {
        assert!(ErrorCategory::Network.to_string().contains("Network"));
    }
}
