//! Shared test fixtures: an in-memory ledger and a scripted data service.

use crate::ledger::{Ledger, LedgerError, lock_key};
use crate::locks::DataLock;
use crate::service::{
    CLIENT_OUTPUT, DataServiceInput, DataServiceOutput, InvokeError, ServiceInvoker, ServiceRecord,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory stand-in for the transactional ledger.
///
/// State mutations apply immediately; the atomicity a real ledger provides
/// at commit time is outside what these tests exercise. The transaction
/// timestamp is fixed so created-at assertions are deterministic.
pub(crate) struct MemLedger {
    pub state: BTreeMap<String, Vec<u8>>,
    now: DateTime<Utc>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self {
            state: BTreeMap::new(),
            now: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    /// Pre-insert a lock entry, bypassing the acquire protocol.
    pub fn insert_lock(&mut self, service: &str, key: &str, request_id: &str) {
        let entry = DataLock {
            request_id: request_id.to_string(),
            service: service.to_string(),
            key: key.to_string(),
        };
        self.state.insert(
            lock_key(service, key),
            serde_json::to_vec(&entry).unwrap(),
        );
    }

    /// Decode the lock entry for (service, key), if present.
    pub fn lock_entry(&self, service: &str, key: &str) -> Option<DataLock> {
        self.state
            .get(&lock_key(service, key))
            .map(|raw| serde_json::from_slice(raw).unwrap())
    }

    /// Number of lock entries currently stored.
    pub fn lock_count(&self) -> usize {
        self.state.keys().filter(|k| k.starts_with('\u{0}')).count()
    }
}

impl Ledger for MemLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.state.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        self.state.remove(key);
        Ok(())
    }

    fn tx_timestamp(&self) -> Result<DateTime<Utc>, LedgerError> {
        Ok(self.now)
    }
}

/// An emissions record owned by the mock data service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Emissions {
    pub uuid: String,
    #[serde(default)]
    pub party_id: String,
    #[serde(default)]
    pub token_id: String,
}

/// Parameters for the mock `UpdateEmissionsWithToken` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTokenParams {
    pub token_id: String,
    pub party_id: String,
}

/// Scripted data service standing in for a real emissions service.
///
/// Methods:
/// - `getValidEmissions`: reports back only the input keys that exist and
///   have no token yet; returns the matching records to the client and a
///   `validUUIDs` record flagged for storage.
/// - `UpdateEmissionsWithToken`: stamps token/party ids onto the records and
///   reports back all input keys; produces no output records.
/// - `alwaysFails`: returns a remote error.
/// - `garbageOutput`: returns bytes that do not parse as a service output.
pub(crate) struct MockEmissionsService {
    pub name: String,
    pub emissions: BTreeMap<String, Emissions>,
}

impl MockEmissionsService {
    pub fn new(name: &str) -> Self {
        let mut emissions = BTreeMap::new();
        for uuid in ["uuid-1", "uuid-2", "uuid-3", "uuid-4"] {
            emissions.insert(
                uuid.to_string(),
                Emissions {
                    uuid: uuid.to_string(),
                    ..Emissions::default()
                },
            );
        }
        for (uuid, token_id, party_id) in [
            ("uuid-5", "tokenId-1", "partyId-1"),
            ("uuid-6", "tokenId-2", "partyId-2"),
        ] {
            emissions.insert(
                uuid.to_string(),
                Emissions {
                    uuid: uuid.to_string(),
                    token_id: token_id.to_string(),
                    party_id: party_id.to_string(),
                },
            );
        }
        Self {
            name: name.to_string(),
            emissions,
        }
    }

    fn get_valid_emissions(&self, input: &DataServiceInput) -> DataServiceOutput {
        let valid: Vec<&Emissions> = input
            .keys
            .iter()
            .filter_map(|key| self.emissions.get(key))
            .filter(|em| em.token_id.is_empty())
            .collect();
        let valid_uuids: Vec<String> = valid.iter().map(|em| em.uuid.clone()).collect();

        DataServiceOutput {
            keys: valid_uuids.clone(),
            output: vec![
                ServiceRecord {
                    name: CLIENT_OUTPUT.to_string(),
                    data: serde_json::to_vec(&valid).unwrap(),
                    to_include: false,
                },
                ServiceRecord {
                    name: "validUUIDs".to_string(),
                    data: serde_json::to_vec(&valid_uuids).unwrap(),
                    to_include: true,
                },
            ],
        }
    }

    fn update_with_token(
        &mut self,
        input: &DataServiceInput,
    ) -> Result<DataServiceOutput, InvokeError> {
        let params: UpdateTokenParams = serde_json::from_slice(&input.params)
            .map_err(|e| InvokeError::new(format!("bad update params: {}", e)))?;

        for key in &input.keys {
            let em = self
                .emissions
                .get_mut(key)
                .ok_or_else(|| InvokeError::new(format!("unknown emissions record {}", key)))?;
            em.token_id = params.token_id.clone();
            em.party_id = params.party_id.clone();
        }

        Ok(DataServiceOutput {
            keys: input.keys.clone(),
            output: Vec::new(),
        })
    }
}

impl ServiceInvoker for MockEmissionsService {
    fn invoke(
        &mut self,
        service: &str,
        method: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, InvokeError> {
        if service != self.name {
            return Err(InvokeError::new(format!("unknown service {}", service)));
        }

        if method == "alwaysFails" {
            return Err(InvokeError::new("business logic rejected the call"));
        }
        if method == "garbageOutput" {
            return Ok(b"not a service output".to_vec());
        }

        let input: DataServiceInput = serde_json::from_slice(payload)
            .map_err(|e| InvokeError::new(format!("bad service input: {}", e)))?;

        let output = match method {
            "getValidEmissions" => self.get_valid_emissions(&input),
            "UpdateEmissionsWithToken" => self.update_with_token(&input)?,
            other => return Err(InvokeError::new(format!("unknown method {}", other))),
        };

        Ok(serde_json::to_vec(&output).unwrap())
    }
}
