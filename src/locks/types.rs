//! Lock entry stored in the ledger.

use serde::{Deserialize, Serialize};

/// A held lock on one (service, record key) pair.
///
/// Stored under `lock_key(service, key)`; deleted on release. At most one
/// entry can exist per pair, which is what gives mutual exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLock {
    /// The request that owns this lock.
    pub request_id: String,

    /// The data service whose record this guards.
    pub service: String,

    /// The record key within the service.
    pub key: String,
}
