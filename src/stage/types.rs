//! Wire types for the stage-update operation.

use crate::request::{CallerType, ChainRecord};
use crate::service::DataServiceInput;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One lock or free operation against a single data service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCall {
    /// Business-logic method to invoke on the service.
    pub method: String,

    /// Record keys the operation targets.
    #[serde(default)]
    pub keys: Vec<String>,

    /// Service-specific parameters, opaque to reqlock.
    #[serde(default)]
    pub params: Vec<u8>,
}

impl ServiceCall {
    /// The payload forwarded to the data service.
    pub fn service_input(&self) -> DataServiceInput {
        DataServiceInput {
            keys: self.keys.clone(),
            params: self.params.clone(),
        }
    }
}

/// Input of one stage update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdateInput {
    /// Request the stage belongs to; created on first use.
    pub request_id: String,

    /// Caller-defined stage name.
    pub stage_name: String,

    /// Caller-defined stage state. `"FINISHED"` combined with `is_last`
    /// finishes the request.
    #[serde(default)]
    pub stage_state: String,

    /// Ownership model for the request; only meaningful on the call that
    /// creates it.
    #[serde(default)]
    pub caller_type: CallerType,

    /// Lock operations, keyed by service name. Executed before any frees.
    #[serde(default)]
    pub fabric_data_locks: BTreeMap<String, ServiceCall>,

    /// Free operations, keyed by service name.
    #[serde(default)]
    pub fabric_data_free: BTreeMap<String, ServiceCall>,

    /// External chain records to append to this stage.
    #[serde(default)]
    pub blockchain_data: Vec<ChainRecord>,

    /// Whether this is the workflow's final stage.
    #[serde(default)]
    pub is_last: bool,
}

/// Output of one stage update: the client-facing bytes each service produced.
///
/// Output a service flagged for storage is not echoed here — it was folded
/// into the request's stage data before persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdateOutput {
    /// Client output per service, from lock operations.
    #[serde(default)]
    pub fabric_data_locks: BTreeMap<String, Vec<u8>>,

    /// Client output per service, from free operations.
    #[serde(default)]
    pub fabric_data_free: BTreeMap<String, Vec<u8>>,
}
