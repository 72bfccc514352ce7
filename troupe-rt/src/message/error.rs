//! Errors surfaced to callers through a rejected invocation.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Failure delivered through a caller's pending reply.
///
/// Any error a handler returns travels back to the caller as one of these.
/// The runtime itself produces `MethodNotFound` for unknown dispatch targets
/// and `Abandoned` when an invocation is dropped before it could settle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActorError {
    /// The dispatched method name is not part of the actor's method table.
    #[error("Method {method} not found")]
    MethodNotFound {
        /// Name the caller asked for.
        method: String,
    },

    /// The arguments did not match what the method expects.
    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments {
        /// Method that rejected its arguments.
        method: String,
        /// What was wrong with them.
        reason: String,
    },

    /// Application-level failure raised by the handler.
    #[error("{0}")]
    Failure(String),

    /// The invocation was dropped before anyone settled it.
    ///
    /// Seen by callers when the target was unsubscribed, the partition had
    /// no subscribers, or the system was freed while the call was queued.
    #[error("call abandoned before completion")]
    Abandoned,
}

impl ActorError {
    /// Rejection for a method name missing from the actor's method table.
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Application failure with the given message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Argument mismatch for `method`.
    pub fn invalid_arguments(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_text() {
        let err = ActorError::method_not_found("run_for");
        assert_eq!(err.to_string(), "Method run_for not found");
    }

    #[test]
    fn test_failure_text_is_verbatim() {
        let err = ActorError::failure("ledger out of balance");
        assert_eq!(err.to_string(), "ledger out of balance");
    }

    #[test]
    fn test_invalid_arguments_names_method() {
        let err = ActorError::invalid_arguments("transfer", "amount must be a number");
        assert!(err.to_string().contains("transfer"));
        assert!(err.to_string().contains("amount must be a number"));
    }
}
