//! Caller identity for reqlock.
//!
//! The transport layer resolves the transaction's credentials to an
//! organization id and a common name before calling into the core; reqlock
//! itself never parses certificates. A failure to resolve should be surfaced
//! by the transport with the `GETTING_CALLER` kind.

use std::fmt;

/// The resolved identity of the caller submitting a stage update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Organization id (e.g., an MSP id).
    pub org_id: String,
    /// Common name of the individual credential within the organization.
    pub common_name: String,
}

impl Identity {
    /// Create an identity from an organization id and a common name.
    pub fn new(org_id: impl Into<String>, common_name: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            common_name: common_name.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.org_id, self.common_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_org_and_common_name() {
        let identity = Identity::new("auditor1", "user1");
        assert_eq!(identity.to_string(), "auditor1::user1");
    }
}
