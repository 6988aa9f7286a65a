//! Error taxonomy shared by every outbound CRM operation
//!
//! All failure modes that can reach the dispatch boundary are represented
//! here so handlers can signal success/failure in their signatures instead of
//! panicking or leaking transport-library error types. The dispatcher folds
//! any of these into the outgoing envelope's error string; callers can still
//! distinguish "the request never landed" (`Transport`) from "the request was
//! rejected" (`Api`) by variant.

use thiserror::Error;

/// Unified error type for credential resolution, transport, and handlers.
#[derive(Debug, Error)]
pub enum CrmError {
    /// No usable token source is configured or the broker handshake failed.
    #[error("{message}")]
    Credential {
        /// Names of the configuration variables that were absent.
        missing: Vec<String>,
        message: String,
    },

    /// The request never produced a response: connect failure or timeout.
    #[error("API request failed: {message}")]
    Transport { message: String },

    /// The remote API answered with a non-2xx status.
    #[error("API request failed: {status} {reason}. Details: {body}")]
    Api {
        status: u16,
        reason: String,
        body: String,
    },

    /// Bad or missing arguments, detected before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// The paged listing violated the cursor protocol.
    #[error("{message}")]
    Pagination { message: String },

    /// Anything that does not fit the categories above.
    #[error("Unexpected error: {message}")]
    Internal { message: String },
}

impl CrmError {
    /// Creates a `Credential` error for missing configuration.
    pub fn missing_config(missing: Vec<String>) -> Self {
        let message = format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        );
        CrmError::Credential { missing, message }
    }

    /// Creates a `Credential` error with a free-form message.
    pub fn credential(message: impl Into<String>) -> Self {
        CrmError::Credential {
            missing: Vec::new(),
            message: message.into(),
        }
    }

    /// Creates a `Transport` error.
    pub fn transport(message: impl Into<String>) -> Self {
        CrmError::Transport {
            message: message.into(),
        }
    }

    /// Creates a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        CrmError::Validation {
            message: message.into(),
        }
    }

    /// Creates a `Pagination` error.
    pub fn pagination(message: impl Into<String>) -> Self {
        CrmError::Pagination {
            message: message.into(),
        }
    }

    /// Creates an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        CrmError::Internal {
            message: message.into(),
        }
    }

    /// Returns true when retrying could plausibly succeed.
    ///
    /// No retry policy is implemented in this repository; the distinction
    /// exists so callers can tell rejections apart from transient failures.
    pub fn is_transient(&self) -> bool {
        match self {
            CrmError::Transport { .. } => true,
            CrmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, CrmError::Validation { .. })
    }
}
