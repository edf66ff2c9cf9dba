//! Acquire, release, and inspection of data locks.

use super::types::DataLock;
use crate::error::{ReqlockError, Result};
use crate::ledger::{Ledger, LedgerError, lock_key};
use crate::service::{CLIENT_OUTPUT, DataServiceInput, DataServiceOutput, ServiceInvoker};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// What one acquire or release call produced, besides its lock mutations.
#[derive(Debug, Default)]
pub struct LockOutcome {
    /// Records the service flagged for persistence into the stage data.
    pub stored: BTreeMap<String, Vec<u8>>,

    /// The record the service addressed directly to the external caller.
    pub client: Option<Vec<u8>>,
}

/// Acquire locks on `service` records for `request_id`.
///
/// Every input key must be free, the service's `method` must succeed, and
/// the keys the service reports back (possibly a narrowed list) are then
/// locked. Any failure rejects the whole operation with no partial locking.
pub fn acquire<L, S>(
    ledger: &mut L,
    invoker: &mut S,
    request_id: &str,
    service: &str,
    method: &str,
    input: &DataServiceInput,
) -> Result<LockOutcome>
where
    L: Ledger + ?Sized,
    S: ServiceInvoker + ?Sized,
{
    debug!(service, request_id, keys = ?input.keys, "checking free state before acquire");
    for key in &input.keys {
        if read_lock(ledger, service, key)?.is_some() {
            error!(service, key, "acquire rejected, key already locked");
            return Err(ReqlockError::AlreadyLocked {
                service: service.to_string(),
                key: key.clone(),
            });
        }
    }

    let output = invoke_service(invoker, service, method, input)?;

    debug!(service, request_id, keys = ?output.keys, "locking keys reported by service");
    for key in &output.keys {
        let entry = DataLock {
            request_id: request_id.to_string(),
            service: service.to_string(),
            key: key.clone(),
        };
        let storage_key = lock_key(service, key);
        let raw = encode_lock(&entry, &storage_key)?;
        ledger
            .put(&storage_key, &raw)
            .map_err(|source| ReqlockError::PuttingState {
                key: storage_key.clone(),
                source,
            })?;
    }

    Ok(partition_records(output))
}

/// Release locks held by `request_id` on `service` records.
///
/// Every input key must be locked by `request_id`, the service's `method`
/// must succeed, and the keys the service reports back are then freed. Any
/// failure rejects the whole operation with every lock left intact.
pub fn release<L, S>(
    ledger: &mut L,
    invoker: &mut S,
    request_id: &str,
    service: &str,
    method: &str,
    input: &DataServiceInput,
) -> Result<LockOutcome>
where
    L: Ledger + ?Sized,
    S: ServiceInvoker + ?Sized,
{
    debug!(service, request_id, keys = ?input.keys, "checking held state before release");
    for key in &input.keys {
        let entry = read_lock(ledger, service, key)?.ok_or_else(|| {
            error!(service, key, "release rejected, key is not locked");
            ReqlockError::FreeLock {
                service: service.to_string(),
                key: key.clone(),
            }
        })?;
        if entry.request_id != request_id {
            error!(
                service,
                key,
                held_by = %entry.request_id,
                "release rejected, lock held by another request"
            );
            return Err(ReqlockError::LockOwnerMismatch {
                service: service.to_string(),
                key: key.clone(),
                held_by: entry.request_id,
                requested_by: request_id.to_string(),
            });
        }
    }

    let output = invoke_service(invoker, service, method, input)?;

    debug!(service, request_id, keys = ?output.keys, "freeing keys reported by service");
    for key in &output.keys {
        let storage_key = lock_key(service, key);
        ledger
            .delete(&storage_key)
            .map_err(|source| ReqlockError::DeletingState {
                key: storage_key.clone(),
                source,
            })?;
    }

    Ok(partition_records(output))
}

/// Read the lock entry for (`service`, `key`), if one is held.
pub fn lock_status<L: Ledger + ?Sized>(
    ledger: &L,
    service: &str,
    key: &str,
) -> Result<Option<DataLock>> {
    read_lock(ledger, service, key)
}

fn read_lock<L: Ledger + ?Sized>(ledger: &L, service: &str, key: &str) -> Result<Option<DataLock>> {
    let storage_key = lock_key(service, key);
    let raw = ledger
        .get(&storage_key)
        .map_err(|source| ReqlockError::GettingState {
            key: storage_key.clone(),
            source,
        })?;

    match raw {
        None => Ok(None),
        Some(bytes) => {
            let entry =
                serde_json::from_slice(&bytes).map_err(|e| ReqlockError::GettingState {
                    key: storage_key,
                    source: LedgerError::new(format!("corrupt lock entry: {}", e)),
                })?;
            Ok(Some(entry))
        }
    }
}

/// Run the service's business logic between precondition check and lock
/// mutation.
fn invoke_service<S: ServiceInvoker + ?Sized>(
    invoker: &mut S,
    service: &str,
    method: &str,
    input: &DataServiceInput,
) -> Result<DataServiceOutput> {
    let payload = serde_json::to_vec(input)
        .map_err(|e| ReqlockError::BadRequestObject(format!("failed to encode service input: {}", e)))?;

    debug!(service, method, "running business logic");
    let response = invoker
        .invoke(service, method, &payload)
        .map_err(|e| {
            error!(service, method, error = %e, "service invocation failed");
            ReqlockError::InvokeService {
                service: service.to_string(),
                method: method.to_string(),
                message: e.to_string(),
            }
        })?;

    serde_json::from_slice(&response).map_err(|e| {
        error!(service, method, error = %e, "service returned an unparseable output");
        ReqlockError::BadServiceOutput {
            service: service.to_string(),
            message: e.to_string(),
        }
    })
}

/// Split the service's records into stored outputs and the client record.
///
/// Only the first record named `"OUTPUT"` goes to the client; other records
/// flagged `to_include` are persisted; the rest are discarded.
fn partition_records(output: DataServiceOutput) -> LockOutcome {
    let mut outcome = LockOutcome::default();
    for record in output.output {
        if record.name == CLIENT_OUTPUT && outcome.client.is_none() {
            outcome.client = Some(record.data);
        } else if record.to_include {
            outcome.stored.insert(record.name, record.data);
        }
    }
    outcome
}

fn encode_lock(entry: &DataLock, storage_key: &str) -> Result<Vec<u8>> {
    serde_json::to_vec(entry).map_err(|e| ReqlockError::PuttingState {
        key: storage_key.to_string(),
        source: LedgerError::new(format!("failed to encode lock entry: {}", e)),
    })
}
