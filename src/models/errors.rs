//! Centralized error handling
//!
//! Three-way taxonomy for everything that can go wrong between a submission
//! and a published result:
//! - VALIDATION_ERROR: rejected before any network call
//! - API_ERROR: the remote service responded and signaled failure
//! - TRANSPORT_ERROR: the request never completed, or the body was undecodable
//!
//! No variant is fatal; every failure leaves the system retryable.

use std::fmt;

/// Discriminated outcome error for analysis and assistant requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Input rejected locally; never reaches the network
    Validation(String),
    /// Remote service responded but reported failure (success:false or
    /// non-2xx with a decodable error body)
    Api(String),
    /// Connectivity failure, timeout, or malformed/undecodable response body
    Transport(String),
}

impl AnalysisError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Stable uppercase code for log correlation
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Api(_) => "API_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// The message as surfaced to the user, without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Api(msg) | Self::Transport(msg) => msg,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for AnalysisError {}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport("Request timeout")
        } else if err.is_connect() {
            Self::transport("Connection failed")
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::transport(format!("Malformed response body: {}", err))
    }
}

/// Result alias for client and orchestrator operations
pub type ApiResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AnalysisError::validation("x").code(), "VALIDATION_ERROR");
        assert_eq!(AnalysisError::api("x").code(), "API_ERROR");
        assert_eq!(AnalysisError::transport("x").code(), "TRANSPORT_ERROR");
    }

    #[test]
    fn test_display_format() {
        let err = AnalysisError::api("Analysis failed");
        assert_eq!(err.to_string(), "[API_ERROR] Analysis failed");
        assert_eq!(err.message(), "Analysis failed");
    }

    #[test]
    fn test_json_error_maps_to_transport() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: AnalysisError = parse_err.into();
        assert_eq!(err.code(), "TRANSPORT_ERROR");
    }
}
