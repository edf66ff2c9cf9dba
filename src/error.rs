//! Error types for reqlock.
//!
//! Uses thiserror for derive macros. Every variant carries a stable
//! machine-readable kind (see [`ReqlockError::kind`]) so transports can
//! surface failures to external callers without parsing display strings.

use crate::ledger::LedgerError;
use thiserror::Error;

/// Main error type for reqlock operations.
///
/// Every failure aborts the entire stage update: the single final ledger
/// write never happens, so no partial lock or request state survives a
/// failed attempt. Nothing is retried internally — retry is the external
/// caller's responsibility.
#[derive(Error, Debug)]
pub enum ReqlockError {
    /// The stage-update payload could not be parsed.
    #[error("bad request object: {0}")]
    BadRequestObject(String),

    /// Reading a key from the ledger failed.
    #[error("failed to read ledger key '{key}'")]
    GettingState {
        key: String,
        #[source]
        source: LedgerError,
    },

    /// Writing a key to the ledger failed.
    #[error("failed to write ledger key '{key}'")]
    PuttingState {
        key: String,
        #[source]
        source: LedgerError,
    },

    /// Deleting a key from the ledger failed.
    #[error("failed to delete ledger key '{key}'")]
    DeletingState {
        key: String,
        #[source]
        source: LedgerError,
    },

    /// A lock entry already exists for the key, so acquire is rejected.
    #[error("key '{key}' on service '{service}' is in locked state")]
    AlreadyLocked { service: String, key: String },

    /// No lock entry exists for the key, so release has nothing to free.
    #[error("key '{key}' on service '{service}' is in free state")]
    FreeLock { service: String, key: String },

    /// The lock is held by a different request than the one releasing it.
    #[error(
        "key '{key}' on service '{service}' is locked by request '{held_by}', not '{requested_by}'"
    )]
    LockOwnerMismatch {
        service: String,
        key: String,
        held_by: String,
        requested_by: String,
    },

    /// The data service returned a non-success response.
    #[error("invoking method '{method}' on service '{service}' failed: {message}")]
    InvokeService {
        service: String,
        method: String,
        message: String,
    },

    /// The data service response did not parse as a service output.
    #[error("invalid response from service '{service}': {message}")]
    BadServiceOutput { service: String, message: String },

    /// Caller identity could not be resolved by the transport layer.
    #[error("failed to resolve caller identity: {0}")]
    GettingCaller(String),

    /// The caller is not the one that created the request.
    #[error("wrong caller: request '{request_id}' may only be updated by its original caller")]
    WrongCaller { request_id: String },

    /// The request already reached its terminal state.
    #[error("request '{request_id}' is already in FINISHED state")]
    RequestAlreadyFinished { request_id: String },

    /// The dispatch boundary was asked for a method it does not support.
    #[error("method '{method}' is not supported")]
    UnsupportedMethod { method: String },
}

impl ReqlockError {
    /// Returns the stable machine-readable kind for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ReqlockError::BadRequestObject(_) => "BAD_REQUEST_OBJECT",
            ReqlockError::GettingState { .. } => "GETTING_STATE",
            ReqlockError::PuttingState { .. } => "PUTTING_STATE",
            ReqlockError::DeletingState { .. } => "DELETING_STATE",
            ReqlockError::AlreadyLocked { .. } => "ALREADY_LOCKED",
            ReqlockError::FreeLock { .. } => "FREE_LOCK",
            ReqlockError::LockOwnerMismatch { .. } => "REQUEST_ID_MISMATCH_ON_LOCK",
            ReqlockError::InvokeService { .. } => "INVOKING_SERVICE",
            ReqlockError::BadServiceOutput { .. } => "BAD_SERVICE_OUTPUT",
            ReqlockError::GettingCaller(_) => "GETTING_CALLER",
            ReqlockError::WrongCaller { .. } => "WRONG_CALLER",
            ReqlockError::RequestAlreadyFinished { .. } => "REQUEST_ALREADY_FINISHED",
            ReqlockError::UnsupportedMethod { .. } => "UNSUPPORTED_METHOD",
        }
    }
}

/// Result type alias for reqlock operations.
pub type Result<T> = std::result::Result<T, ReqlockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_errors_have_stable_kinds() {
        let err = ReqlockError::AlreadyLocked {
            service: "UtilityEmissionsCC".to_string(),
            key: "uuid-1".to_string(),
        };
        assert_eq!(err.kind(), "ALREADY_LOCKED");

        let err = ReqlockError::FreeLock {
            service: "UtilityEmissionsCC".to_string(),
            key: "uuid-1".to_string(),
        };
        assert_eq!(err.kind(), "FREE_LOCK");

        let err = ReqlockError::LockOwnerMismatch {
            service: "UtilityEmissionsCC".to_string(),
            key: "uuid-1".to_string(),
            held_by: "req-1".to_string(),
            requested_by: "req-2".to_string(),
        };
        assert_eq!(err.kind(), "REQUEST_ID_MISMATCH_ON_LOCK");
    }

    #[test]
    fn workflow_errors_have_stable_kinds() {
        let err = ReqlockError::WrongCaller {
            request_id: "req-1".to_string(),
        };
        assert_eq!(err.kind(), "WRONG_CALLER");

        let err = ReqlockError::RequestAlreadyFinished {
            request_id: "req-1".to_string(),
        };
        assert_eq!(err.kind(), "REQUEST_ALREADY_FINISHED");

        let err = ReqlockError::BadRequestObject("truncated input".to_string());
        assert_eq!(err.kind(), "BAD_REQUEST_OBJECT");
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = ReqlockError::LockOwnerMismatch {
            service: "UtilityEmissionsCC".to_string(),
            key: "uuid-1".to_string(),
            held_by: "req-1".to_string(),
            requested_by: "req-2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("uuid-1"));
        assert!(msg.contains("req-1"));
        assert!(msg.contains("req-2"));

        let err = ReqlockError::RequestAlreadyFinished {
            request_id: "req-9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request 'req-9' is already in FINISHED state"
        );
    }

    #[test]
    fn ledger_errors_carry_the_offending_key() {
        let err = ReqlockError::GettingState {
            key: "req-1".to_string(),
            source: LedgerError::new("connection reset"),
        };
        assert_eq!(err.kind(), "GETTING_STATE");
        assert!(err.to_string().contains("req-1"));
    }
}
