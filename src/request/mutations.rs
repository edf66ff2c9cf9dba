//! Mutation helpers and policy checks for request records.

use super::{CallerType, ChainRecord, Request, RequestState, STAGE_STATE_FINISHED, StageData};
use crate::error::{ReqlockError, Result};
use crate::identity::Identity;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

impl Request {
    /// Create a new request in the `Processing` state.
    ///
    /// The caller id is fixed here and never changes afterwards.
    pub fn new(
        id: impl Into<String>,
        caller_type: CallerType,
        caller: &Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            state: RequestState::Processing,
            caller_type,
            caller_id: caller_type.caller_id(caller),
            current_stage_name: String::new(),
            current_stage_state: String::new(),
            created_at,
            stage_data: BTreeMap::new(),
        }
    }

    /// Fail with `RequestAlreadyFinished` if the request is terminal.
    pub fn ensure_updatable(&self) -> Result<()> {
        match self.state {
            RequestState::Processing => Ok(()),
            RequestState::Finished => Err(ReqlockError::RequestAlreadyFinished {
                request_id: self.id.clone(),
            }),
        }
    }

    /// Fail with `WrongCaller` unless `caller` matches the stored caller id
    /// under this request's caller type.
    pub fn ensure_owned_by(&self, caller: &Identity) -> Result<()> {
        if self.caller_id == self.caller_type.caller_id(caller) {
            Ok(())
        } else {
            Err(ReqlockError::WrongCaller {
                request_id: self.id.clone(),
            })
        }
    }

    /// Point the request at `stage_name`/`stage_state` and make sure a
    /// stage-data entry exists for the stage.
    pub fn touch_stage(&mut self, stage_name: &str, stage_state: &str) -> &mut StageData {
        self.current_stage_name = stage_name.to_string();
        self.current_stage_state = stage_state.to_string();
        self.stage_data.entry(stage_name.to_string()).or_default()
    }

    /// Replace the persisted outputs of `service` under `stage_name`.
    ///
    /// Entries for other services under the same stage are untouched.
    pub fn record_outputs(
        &mut self,
        stage_name: &str,
        service: &str,
        outputs: BTreeMap<String, Vec<u8>>,
    ) {
        self.stage_data
            .entry(stage_name.to_string())
            .or_default()
            .outputs
            .insert(service.to_string(), outputs);
    }

    /// Append caller-supplied chain records to `stage_name`.
    pub fn append_chain_records(&mut self, stage_name: &str, records: Vec<ChainRecord>) {
        if records.is_empty() {
            return;
        }
        self.stage_data
            .entry(stage_name.to_string())
            .or_default()
            .blockchain_data
            .extend(records);
    }

    /// Move the request to `Finished` when the caller marked this stage as
    /// the last one and set its state to `"FINISHED"`.
    ///
    /// Returns whether the transition happened.
    pub fn finish_if_last(&mut self, is_last: bool, stage_state: &str) -> bool {
        if is_last && stage_state == STAGE_STATE_FINISHED {
            self.state = RequestState::Finished;
            true
        } else {
            false
        }
    }
}
