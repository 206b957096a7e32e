//! External collaborators of the registry.
//!
//! The registry delegates two concerns to its host environment: deciding
//! whether a caller is a recognized issuing institution, and moving the
//! storage fee from the caller to the authority contract. Both are trait
//! seams so tests can substitute deterministic in-memory implementations.

use std::collections::BTreeSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::Principal;

/// Classifies principals as verified issuing institutions.
///
/// The registry trusts the answer unconditionally and never caches it, so
/// granting or revoking authority between calls takes effect immediately.
pub trait AuthorityOracle: Send + Sync {
    fn is_verified_authority(&self, principal: &Principal) -> bool;
}

/// A single fee transfer from an issuing caller to the authority contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: u64,
    pub from: Principal,
    pub to: Principal,
}

/// Records fee transfers at issuance time.
///
/// The registry asserts that the transfer is recorded; whether the transfer
/// itself settles is the ledger's concern, not modeled here.
pub trait ValueTransferLedger: Send + Sync {
    fn record_transfer(&self, transfer: Transfer);
}

/// In-memory [`AuthorityOracle`] backed by a mutable set of principals.
#[derive(Debug, Default)]
pub struct StaticAuthoritySet {
    verified: Mutex<BTreeSet<Principal>>,
}

impl StaticAuthoritySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an initial list of verified principals.
    pub fn with_authorities<I, P>(principals: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        StaticAuthoritySet {
            verified: Mutex::new(principals.into_iter().map(Into::into).collect()),
        }
    }

    pub fn grant(&self, principal: impl Into<Principal>) {
        self.verified.lock().unwrap().insert(principal.into());
    }

    pub fn revoke(&self, principal: &Principal) {
        self.verified.lock().unwrap().remove(principal);
    }

    pub fn clear(&self) {
        self.verified.lock().unwrap().clear();
    }
}

impl AuthorityOracle for StaticAuthoritySet {
    fn is_verified_authority(&self, principal: &Principal) -> bool {
        self.verified.lock().unwrap().contains(principal)
    }
}

/// In-memory [`ValueTransferLedger`] that appends every transfer to a log.
#[derive(Debug, Default)]
pub struct InMemoryTransferLog {
    entries: Mutex<Vec<Transfer>>,
}

impl InMemoryTransferLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded transfers, in order.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl ValueTransferLedger for InMemoryTransferLog {
    fn record_transfer(&self, transfer: Transfer) {
        self.entries.lock().unwrap().push(transfer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_set_grant_and_revoke_take_effect_immediately() {
        let oracle = StaticAuthoritySet::with_authorities(["ST1TEST"]);
        let caller = Principal::from("ST1TEST");
        assert!(oracle.is_verified_authority(&caller));

        oracle.revoke(&caller);
        assert!(!oracle.is_verified_authority(&caller));

        oracle.grant("ST1TEST");
        assert!(oracle.is_verified_authority(&caller));
    }

    #[test]
    fn transfer_log_preserves_order() {
        let log = InMemoryTransferLog::new();
        assert!(log.is_empty());

        log.record_transfer(Transfer {
            amount: 500,
            from: Principal::from("ST1TEST"),
            to: Principal::from("ST2TEST"),
        });
        log.record_transfer(Transfer {
            amount: 1000,
            from: Principal::from("ST9TEST"),
            to: Principal::from("ST2TEST"),
        });

        let transfers = log.transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].amount, 500);
        assert_eq!(transfers[1].from, Principal::from("ST9TEST"));
    }
}
