//! Transfer-related value types

use super::account::AccountId;
use rust_decimal::Decimal;

/// Outcome of a successful transfer
///
/// Both balances were captured inside the same critical section that applied
/// the transfer, so they describe one consistent state of the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferReceipt {
    /// Account that was debited
    pub source: AccountId,

    /// Account that was credited
    pub destination: AccountId,

    /// Amount moved
    pub amount: Decimal,

    /// Source balance right after the transfer
    pub source_balance: Decimal,

    /// Destination balance right after the transfer
    pub destination_balance: Decimal,
}

/// Counters kept by the transfer coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Transfers applied to both accounts
    pub completed: u64,

    /// Transfers refused for insufficient funds or overflow
    pub refused: u64,
}

impl TransferStats {
    /// Total number of transfers that reached the funds check
    pub fn attempted(&self) -> u64 {
        self.completed + self.refused
    }
}
