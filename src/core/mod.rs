//! Core ledger module
//!
//! This module contains the concurrent ledger components:
//! - `account` - Guarded account balances (credit, debit, balance)
//! - `coordinator` - Atomic two-account transfers under a global lock order
//! - `ledger` - Concurrent account registry

pub mod account;
pub mod coordinator;
pub mod ledger;

#[cfg(test)]
pub(crate) mod log_capture;

pub use account::Account;
pub use coordinator::TransferCoordinator;
pub use ledger::Ledger;
