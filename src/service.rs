//! Cross-service invocation interface and wire types.
//!
//! Data services own the records reqlock guards. During acquire and release
//! the lock manager calls the owning service synchronously, by name, with a
//! JSON payload; the call participates in the host transaction, so its
//! ledger effects commit or abort together with reqlock's own writes.
//!
//! The contract a data service must satisfy: given a
//! [`DataServiceInput`] it runs its own business validation/mutation and
//! returns a [`DataServiceOutput`] naming the keys that should actually be
//! locked or unlocked (possibly a subset of the input keys) and a list of
//! named output records. A record named [`CLIENT_OUTPUT`] is routed straight
//! back to the external caller; records flagged `to_include` are persisted
//! into the request's stage data; everything else is discarded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved record name for output sent directly to the external caller.
pub const CLIENT_OUTPUT: &str = "OUTPUT";

/// Non-success response from a data service.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct InvokeError {
    message: String,
}

impl InvokeError {
    /// Create an invoke error carrying the remote error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Synchronous call-by-name invocation of a data service.
///
/// Implementations are expected to execute within the calling transaction;
/// reqlock treats the nested call's effects as part of its own atomicity
/// boundary.
pub trait ServiceInvoker {
    /// Invoke `method` on `service` with the given payload bytes.
    ///
    /// Returns the raw response payload on success, or the remote error
    /// message on failure.
    fn invoke(&mut self, service: &str, method: &str, payload: &[u8])
    -> Result<Vec<u8>, InvokeError>;
}

/// Payload sent to a data service before locking or freeing its keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataServiceInput {
    /// Record keys the caller wants locked or freed.
    pub keys: Vec<String>,
    /// Service-specific parameters, opaque to reqlock.
    #[serde(default)]
    pub params: Vec<u8>,
}

/// Response returned by a data service to the lock manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataServiceOutput {
    /// Keys that should actually be locked or unlocked.
    ///
    /// The service may narrow the input list, e.g. filtering out keys that
    /// fail its own validation.
    pub keys: Vec<String>,

    /// Named output records produced while running the business logic.
    #[serde(default)]
    pub output: Vec<ServiceRecord>,
}

/// One named output record produced by a data service call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Record name. [`CLIENT_OUTPUT`] routes the record to the client.
    pub name: String,

    /// Record payload, opaque to reqlock.
    #[serde(default)]
    pub data: Vec<u8>,

    /// Whether to persist this record into the request's stage data.
    #[serde(default)]
    pub to_include: bool,
}
