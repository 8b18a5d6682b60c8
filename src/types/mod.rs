//! Types module
//!
//! Contains the value types used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identity and snapshots
//! - `transfer`: Transfer receipts and counters
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{AccountId, AccountSnapshot};
pub use error::{ensure_positive, LedgerError};
pub use transfer::{TransferReceipt, TransferStats};
