//! Lock manager for cross-service record locks.
//!
//! This module implements the optimistic locking protocol that lets one
//! request claim records owned by independent data services:
//!
//! 1. Check the lock state of every requested key.
//! 2. Invoke the owning service so its business logic runs while the keys
//!    are guaranteed free (acquire) or held by the caller (release).
//! 3. Mutate the lock entries for the keys the service reported back.
//!
//! The remote call sits strictly between the precondition check and the lock
//! mutation, so the service validates inputs nobody else can be mutating, and
//! keys its validation rejects are never locked.
//!
//! A lock is a [`DataLock`] entry stored under the namespaced key built by
//! [`crate::ledger::lock_key`]; the existence of the entry is the lock state.
//! There is no expiry or lease: a lock whose owning request never completes
//! stays held until explicitly released.

mod operations;
mod types;


pub use operations::{LockOutcome, acquire, lock_status, release};
pub use types::DataLock;
