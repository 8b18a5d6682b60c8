//! Account-related value types
//!
//! The guarded account itself lives in [`crate::core::account`]; this module
//! holds the plain values that describe accounts from the outside.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Stable account identity
///
/// Ids are handed out in increasing order by the [`crate::core::Ledger`] and
/// never reused. The ordering of ids is the global lock order used by
/// transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point-in-time view of a single account
///
/// The balance was read under the account's guard, so it is never a value
/// mid-mutation. A set of snapshots taken one after another is not a global
/// atomic view across accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    /// The account id
    pub id: AccountId,

    /// Human-readable account name
    pub name: String,

    /// Balance at the moment of the read
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_display() {
        assert_eq!(AccountId(12).to_string(), "#12");
    }

    #[test]
    fn test_account_id_ordering_follows_number() {
        let mut ids = vec![AccountId(3), AccountId(1), AccountId(2)];
        ids.sort();
        assert_eq!(ids, vec![AccountId(1), AccountId(2), AccountId(3)]);
    }
}
