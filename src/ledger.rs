//! Ledger interface and key composition for reqlock.
//!
//! The ledger is an external transactional key-value store. All reads and
//! writes made through a [`Ledger`] handle are scoped to the current
//! transaction: they become visible atomically at commit, and conflicting
//! commits are serialized by the store itself (the loser is rejected and must
//! be resubmitted by its caller). Reqlock relies on that guarantee instead of
//! implementing any two-phase commit of its own.
//!
//! # Key namespacing
//!
//! Request records are stored under their bare request id. Lock entries are
//! stored under composite keys built by [`lock_key`], which joins the
//! `LOCKER` namespace, the service name, and the record key with a NUL
//! separator. Bare request ids cannot contain NUL, so the two key families
//! can never collide.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Namespace prefix for lock entries.
pub const LOCK_NAMESPACE: &str = "LOCKER";

/// Separator used when composing namespaced keys.
///
/// NUL is not a valid character in request ids or service names, which is
/// what keeps composite keys out of the flat key space.
const KEY_SEPARATOR: char = '\u{0}';

/// Failure reported by a ledger implementation.
///
/// Treated as fatal to the current attempt; the orchestrator maps it to
/// `GETTING_STATE` / `PUTTING_STATE` / `DELETING_STATE` depending on the
/// operation and never retries.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct LedgerError {
    message: String,
}

impl LedgerError {
    /// Create a ledger error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Transaction-scoped handle to the key-value ledger.
///
/// One handle corresponds to one in-progress transaction. Mutations become
/// durable only when the host commits; if the stage update returns an error
/// the host aborts and every mutation made through the handle is discarded.
pub trait Ledger {
    /// Read the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` under `key`, creating or replacing the entry.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Delete the entry under `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), LedgerError>;

    /// The timestamp of the current transaction.
    ///
    /// Used as the creation time of new requests so that every peer replaying
    /// the transaction derives the same value.
    fn tx_timestamp(&self) -> Result<DateTime<Utc>, LedgerError>;
}

/// Compose a namespaced ledger key from its parts.
///
/// The result starts with the separator so composed keys sort and match
/// apart from every bare key.
pub fn compose_key(parts: &[&str]) -> String {
    let mut key = String::new();
    for part in parts {
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
    key.push(KEY_SEPARATOR);
    key
}

/// Build the ledger key guarding `record_key` on `service`.
///
/// Locks from different services never collide even when they guard records
/// with identical keys.
pub fn lock_key(service: &str, record_key: &str) -> String {
    compose_key(&[LOCK_NAMESPACE, service, record_key])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_key_wraps_parts_in_separators() {
        let key = compose_key(&["LOCKER", "svc", "k1"]);
        assert_eq!(key, "\u{0}LOCKER\u{0}svc\u{0}k1\u{0}");
    }

    #[test]
    fn lock_keys_never_collide_with_request_ids() {
        // Request records live under their bare id, which cannot contain NUL.
        let key = lock_key("UtilityEmissionsCC", "req-1");
        assert!(key.contains('\u{0}'));
        assert_ne!(key, "req-1");
    }

    #[test]
    fn lock_keys_are_distinct_per_service() {
        let a = lock_key("ServiceA", "uuid-1");
        let b = lock_key("ServiceB", "uuid-1");
        assert_ne!(a, b);
    }

    #[test]
    fn lock_keys_are_distinct_per_record() {
        let a = lock_key("ServiceA", "uuid-1");
        let b = lock_key("ServiceA", "uuid-2");
        assert_ne!(a, b);
    }

    #[test]
    fn adjacent_parts_cannot_be_confused() {
        // ("ab", "c") and ("a", "bc") must produce different keys.
        let a = compose_key(&["LOCKER", "ab", "c"]);
        let b = compose_key(&["LOCKER", "a", "bc"]);
        assert_ne!(a, b);
    }
}
