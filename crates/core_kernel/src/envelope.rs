//! The uniform response envelope
//!
//! Every terminal response to a caller is `{result, error}` with exactly one
//! side populated. Handlers are free to return richer shapes internally
//! (`{status, contact}`, raw arrays, plain objects); the dispatcher coerces
//! those into this envelope at the outer boundary and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CrmError;

/// Terminal response wrapper returned for every operation.
///
/// Both keys are always serialized, the unused side as `null`, matching the
/// wire shape callers pattern-match on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl Envelope {
    /// Wraps a handler's native return value.
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Wraps an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Returns true when exactly one side is populated.
    ///
    /// This is the universal invariant: a violated envelope indicates a
    /// dispatcher bug, not a handler failure.
    pub fn is_well_formed(&self) -> bool {
        self.result.is_some() != self.error.is_some()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

impl From<Result<Value, CrmError>> for Envelope {
    fn from(outcome: Result<Value, CrmError>) -> Self {
        match outcome {
            Ok(value) => Envelope::ok(value),
            Err(err) => Envelope::error(err.to_string()),
        }
    }
}
