//! Ledger persistence for request records.

use super::Request;
use crate::error::{ReqlockError, Result};
use crate::ledger::{Ledger, LedgerError};

impl Request {
    /// Read the request stored under `request_id`, if any.
    ///
    /// A stored record that fails to decode is reported as a read failure:
    /// the ledger returned bytes this crate could not have written.
    pub fn read<L: Ledger + ?Sized>(ledger: &L, request_id: &str) -> Result<Option<Self>> {
        let raw = ledger
            .get(request_id)
            .map_err(|source| ReqlockError::GettingState {
                key: request_id.to_string(),
                source,
            })?;

        match raw {
            None => Ok(None),
            Some(bytes) => {
                let request =
                    serde_json::from_slice(&bytes).map_err(|e| ReqlockError::GettingState {
                        key: request_id.to_string(),
                        source: LedgerError::new(format!("corrupt request record: {}", e)),
                    })?;
                Ok(Some(request))
            }
        }
    }

    /// Persist this request as the single ledger write of a stage update.
    pub fn write<L: Ledger + ?Sized>(&self, ledger: &mut L) -> Result<()> {
        let raw = serde_json::to_vec(self).map_err(|e| ReqlockError::PuttingState {
            key: self.id.clone(),
            source: LedgerError::new(format!("failed to encode request: {}", e)),
        })?;

        ledger
            .put(&self.id, &raw)
            .map_err(|source| ReqlockError::PuttingState {
                key: self.id.clone(),
                source,
            })
    }
}
