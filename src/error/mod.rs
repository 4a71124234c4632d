use std::fmt;

use thiserror::Error;

/// Classification of a failed call to the oracle's HTTP API.
///
/// Built from the response status code so callers can tell an expired key from
/// an exhausted quota without string matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The API key was missing, malformed, or rejected (401/403)
    AuthenticationFailed,
    /// Quota exhausted or too many requests (429)
    RateLimited,
    /// The request itself was rejected (400, 404, 422)
    BadRequest { details: String },
    /// The provider failed on its side (5xx)
    ServerError { status: u16, details: String },
    /// The provider answered, but not with anything usable
    UnexpectedResponse { details: String },
}

impl ApiErrorKind {
    /// Map an HTTP status code and response body to an error kind.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let details = body.into();
        match status {
            401 | 403 => ApiErrorKind::AuthenticationFailed,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::ServerError { status, details },
            _ => ApiErrorKind::BadRequest { details },
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::AuthenticationFailed => write!(f, "authentication failed"),
            ApiErrorKind::RateLimited => write!(f, "rate limited"),
            ApiErrorKind::BadRequest { details } => write!(f, "bad request: {}", details),
            ApiErrorKind::ServerError { status, details } => {
                write!(f, "server error ({}): {}", status, details)
            }
            ApiErrorKind::UnexpectedResponse { details } => {
                write!(f, "unexpected response: {}", details)
            }
        }
    }
}

/// Error types for the rxverify crate.
///
/// Each variant is one root cause. At the screen boundary, transport-level
/// variants and schema violations are collapsed into an
/// [`AnalysisFailure`](crate::AnalysisFailure) carrying a generic message;
/// only [`RxVerifyError::ValidationError`] is ever shown to the user verbatim.
///
/// # Examples
///
/// ```
/// use rxverify::{RxVerifyError, Result};
///
/// fn require_age(age: f64) -> Result<()> {
///     if age < 0.0 {
///         return Err(RxVerifyError::ValidationError("Age cannot be negative".into()));
///     }
///     Ok(())
/// }
///
/// match require_age(-1.0) {
///     Err(RxVerifyError::ValidationError(msg)) => assert_eq!(msg, "Age cannot be negative"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum RxVerifyError {
    /// The oracle's API rejected or failed the call
    #[error("{provider} API error: {kind}")]
    ApiError {
        provider: String,
        kind: ApiErrorKind,
    },

    /// Required user input is missing or malformed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The oracle's reply parsed as JSON but does not match the declared shape
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Startup configuration is missing or invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[cfg(feature = "gemini")]
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RxVerifyError {
    pub fn api_error(provider: impl Into<String>, kind: ApiErrorKind) -> Self {
        RxVerifyError::ApiError {
            provider: provider.into(),
            kind,
        }
    }

    /// True when the failure came from the oracle's reply rather than from
    /// getting a reply at all.
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            RxVerifyError::SchemaViolation(_) | RxVerifyError::JsonError(_)
        )
    }
}

// reqwest::Error and serde_json::Error don't implement PartialEq, so those
// variants never compare equal.
impl PartialEq for RxVerifyError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::ApiError { provider: p1, kind: k1 },
                Self::ApiError { provider: p2, kind: k2 },
            ) => p1 == p2 && k1 == k2,
            (Self::ValidationError(a), Self::ValidationError(b)) => a == b,
            (Self::SchemaViolation(a), Self::SchemaViolation(b)) => a == b,
            (Self::ConfigError(a), Self::ConfigError(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for rxverify operations.
pub type Result<T> = std::result::Result<T, RxVerifyError>;
