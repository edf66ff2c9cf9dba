//! Stage-update orchestrator.
//!
//! A stage update is the single public operation of reqlock. One call:
//!
//! 1. loads or creates the request and enforces its ownership and terminal
//!    state policies,
//! 2. acquires every requested lock, then releases every requested free
//!    (locks happen-before frees, so a stage can hand a record off by
//!    acquiring the next stage's keys before releasing the current ones),
//! 3. folds service outputs and caller-supplied chain records into the
//!    request's stage data,
//! 4. finishes the request when the caller marked this stage as last with
//!    stage state `"FINISHED"`, and
//! 5. persists the request as exactly one ledger write.
//!
//! Any failure aborts the whole update before that final write, so within
//! the host transaction nothing is persisted — the request and all locks
//! remain exactly as before the attempt.

mod types;
mod update;


pub use types::{ServiceCall, StageUpdateInput, StageUpdateOutput};
pub use update::{apply_stage_update, stage_update};
