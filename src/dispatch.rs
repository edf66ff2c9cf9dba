//! Typed command boundary.
//!
//! Transports receive a method name and a raw payload from the outside
//! world. Instead of a name→handler registry, the boundary parses the pair
//! into a [`Command`] and dispatches with an explicit match, so the set of
//! supported operations is closed and checked by the compiler.

use crate::error::{ReqlockError, Result};
use crate::identity::Identity;
use crate::ledger::Ledger;
use crate::service::ServiceInvoker;
use crate::stage;

/// Method name of the stage-update operation.
pub const METHOD_STAGE_UPDATE: &str = "stageUpdate";

/// A parsed request-coordinator operation.
#[derive(Debug)]
pub enum Command {
    /// Advance a request by one stage.
    StageUpdate { payload: Vec<u8> },
}

impl Command {
    /// Parse a transport-level (method, payload) pair.
    ///
    /// Unknown method names fail with `UNSUPPORTED_METHOD`; payload parsing
    /// is deferred to the operation itself so its errors keep their own
    /// kinds.
    pub fn parse(method: &str, payload: &[u8]) -> Result<Self> {
        match method {
            METHOD_STAGE_UPDATE => Ok(Command::StageUpdate {
                payload: payload.to_vec(),
            }),
            other => Err(ReqlockError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Execute a parsed command, returning the raw response payload.
pub fn dispatch<L, S>(
    ledger: &mut L,
    invoker: &mut S,
    caller: &Identity,
    command: Command,
) -> Result<Vec<u8>>
where
    L: Ledger + ?Sized,
    S: ServiceInvoker + ?Sized,
{
    match command {
        Command::StageUpdate { payload } => stage::stage_update(ledger, invoker, caller, &payload),
    }
}
