//! The stage-update algorithm.

use super::types::{StageUpdateInput, StageUpdateOutput};
use crate::error::{ReqlockError, Result};
use crate::identity::Identity;
use crate::ledger::Ledger;
use crate::locks;
use crate::request::Request;
use crate::service::ServiceInvoker;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Apply one stage update from raw JSON bytes, returning raw JSON bytes.
///
/// Thin boundary wrapper around [`apply_stage_update`]: parses the input,
/// runs the orchestrator, serializes the output. Malformed input fails with
/// `BAD_REQUEST_OBJECT`.
pub fn stage_update<L, S>(
    ledger: &mut L,
    invoker: &mut S,
    caller: &Identity,
    raw: &[u8],
) -> Result<Vec<u8>>
where
    L: Ledger + ?Sized,
    S: ServiceInvoker + ?Sized,
{
    let input: StageUpdateInput = serde_json::from_slice(raw)
        .map_err(|e| ReqlockError::BadRequestObject(e.to_string()))?;

    let output = apply_stage_update(ledger, invoker, caller, &input)?;

    serde_json::to_vec(&output)
        .map_err(|e| ReqlockError::BadRequestObject(format!("failed to encode output: {}", e)))
}

/// Apply one parsed stage update.
///
/// This is the whole orchestrator: it performs at most one ledger write (the
/// updated request), and only after every lock and free operation succeeded.
/// Returning an error therefore means nothing was persisted within the host
/// transaction.
pub fn apply_stage_update<L, S>(
    ledger: &mut L,
    invoker: &mut S,
    caller: &Identity,
    input: &StageUpdateInput,
) -> Result<StageUpdateOutput>
where
    L: Ledger + ?Sized,
    S: ServiceInvoker + ?Sized,
{
    debug!(request_id = %input.request_id, stage = %input.stage_name, "stage update");

    let mut request = match Request::read(ledger, &input.request_id)? {
        Some(existing) => {
            existing.ensure_updatable()?;
            existing.ensure_owned_by(caller)?;
            existing
        }
        None => {
            debug!(request_id = %input.request_id, "request does not exist, treating stage as first");
            let created_at = ledger
                .tx_timestamp()
                .map_err(|source| ReqlockError::GettingState {
                    key: input.request_id.clone(),
                    source,
                })?;
            Request::new(&input.request_id, input.caller_type, caller, created_at)
        }
    };

    request.touch_stage(&input.stage_name, &input.stage_state);

    // Locks happen-before frees within one stage update.
    let mut lock_outputs = BTreeMap::new();
    for (service, call) in &input.fabric_data_locks {
        let outcome = locks::acquire(
            ledger,
            invoker,
            &input.request_id,
            service,
            &call.method,
            &call.service_input(),
        )?;
        if let Some(client) = outcome.client {
            lock_outputs.insert(service.clone(), client);
        }
        if !outcome.stored.is_empty() {
            request.record_outputs(&input.stage_name, service, outcome.stored);
        }
    }

    let mut free_outputs = BTreeMap::new();
    for (service, call) in &input.fabric_data_free {
        let outcome = locks::release(
            ledger,
            invoker,
            &input.request_id,
            service,
            &call.method,
            &call.service_input(),
        )?;
        if let Some(client) = outcome.client {
            free_outputs.insert(service.clone(), client);
        }
        if !outcome.stored.is_empty() {
            request.record_outputs(&input.stage_name, service, outcome.stored);
        }
    }

    request.append_chain_records(&input.stage_name, input.blockchain_data.clone());

    if request.finish_if_last(input.is_last, &input.stage_state) {
        info!(request_id = %input.request_id, "request finished");
    }

    request.write(ledger)?;

    Ok(StageUpdateOutput {
        fabric_data_locks: lock_outputs,
        fabric_data_free: free_outputs,
    })
}
