//! Reqlock: saga-style request coordinator with cross-service record locks.
//!
//! Reqlock coordinates multi-stage workflows ("requests") that read and
//! mutate data owned by several independent data services sharing one
//! transactional key-value ledger. Two concurrent requests are never allowed
//! to operate on the same underlying record:
//!
//! - The [`locks`] module implements an optimistic locking protocol that
//!   verifies a key is free, delegates business logic to the owning service,
//!   and records the lock — all inside the host ledger transaction.
//! - The [`stage`] module implements the stage-update orchestrator and the
//!   request state machine: a request stays `PROCESSING` until the caller
//!   explicitly marks its final stage as finished.
//!
//! The ledger store, the cross-service invocation mechanism, and caller
//! identity resolution are external collaborators. They are injected through
//! the [`ledger::Ledger`] and [`service::ServiceInvoker`] traits and the
//! [`identity::Identity`] value; reqlock itself never parses credentials or
//! talks to a network.
//!
//! Atomicity is inherited from the host transaction: a stage update performs
//! exactly one write of the request record, and any failure before that write
//! leaves the request and every lock exactly as they were.

pub mod dispatch;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod locks;
pub mod request;
pub mod service;
pub mod stage;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ReqlockError, Result};
pub use identity::Identity;
