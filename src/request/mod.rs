//! Request data model for reqlock.
//!
//! A `Request` is one workflow instance, keyed in the ledger by its
//! caller-supplied id. The request tracks which stage the workflow last
//! touched, accumulates per-stage outputs from data services, and carries
//! the two-state saga machine:
//!
//! ```text
//! PROCESSING ──(isLast && stageState == "FINISHED")──▶ FINISHED
//! ```
//!
//! `FINISHED` is terminal: no further stage updates are accepted. All other
//! workflow nuance lives in the free-form current-stage strings, which are
//! opaque to this crate and fully caller-defined.
//!
//! Every container is fully initialized at construction — an empty map, not
//! an absent one — so no code path needs defensive nil handling.

use crate::identity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod io;
mod mutations;

/// Stage state value that, combined with `isLast`, finishes a request.
pub const STAGE_STATE_FINISHED: &str = "FINISHED";

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    /// The workflow is in progress; stage updates are accepted.
    Processing,
    /// Terminal. The request rejects every further stage update.
    Finished,
}

/// Who owns a request: an individual credential or a whole organization.
///
/// Fixed at creation; determines the ownership check applied to every
/// subsequent stage update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallerType {
    /// Only the identical (org id, common name) pair may advance the request.
    #[default]
    Client,
    /// Any credential of the creating organization may advance the request.
    Msp,
}

impl CallerType {
    /// Derive the stored caller id for `identity` under this caller type.
    pub fn caller_id(&self, identity: &Identity) -> String {
        match self {
            CallerType::Client => identity.to_string(),
            CallerType::Msp => identity.org_id.clone(),
        }
    }
}

/// One workflow instance, stored in the ledger under its bare id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Caller-supplied request id, globally unique in the ledger key space.
    pub id: String,

    /// Saga state; monotonic `Processing` → `Finished`.
    pub state: RequestState,

    /// Ownership model fixed at creation.
    pub caller_type: CallerType,

    /// Caller id computed at creation per [`CallerType::caller_id`].
    pub caller_id: String,

    /// Name of the last stage touched.
    #[serde(default)]
    pub current_stage_name: String,

    /// Caller-defined state of the last stage touched.
    #[serde(default)]
    pub current_stage_state: String,

    /// Ledger transaction timestamp at creation.
    pub created_at: DateTime<Utc>,

    /// Accumulated data per distinct stage name ever touched.
    #[serde(default)]
    pub stage_data: BTreeMap<String, StageData>,
}

/// Accumulated results for one stage of a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageData {
    /// Outputs a data service asked to persist, keyed by service name then
    /// output name. A later call for the same service under the same stage
    /// replaces that service's entry wholesale.
    #[serde(default)]
    pub outputs: BTreeMap<String, BTreeMap<String, Vec<u8>>>,

    /// Caller-supplied external chain records, append-only across stage
    /// updates to the same stage.
    #[serde(default)]
    pub blockchain_data: Vec<ChainRecord>,
}

/// A record of activity on an external blockchain, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    /// Network name (e.g., "Ethereum").
    pub network: String,

    /// Address of the contract involved.
    pub contract_address: String,

    /// Arbitrary key→value details (e.g., minted token ids).
    #[serde(default)]
    pub keys_created: BTreeMap<String, String>,
}
