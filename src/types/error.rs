//! Error types for the ledger simulation
//!
//! This module defines every error that can surface from ledger operations
//! and from the simulation driver around them.
//!
//! # Error Categories
//!
//! - **Funds Errors**: Insufficient funds on a debit or transfer (expected, recoverable)
//! - **Caller Errors**: Non-positive amounts, self-transfers (rejected before any lock is taken)
//! - **Arithmetic Errors**: Overflow in balance calculations
//! - **Driver Errors**: Runtime construction, report I/O

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Funds-related variants are ordinary outcomes: callers branch on them and
/// keep running. None of them is ever raised as a panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The source balance does not cover the requested amount
    ///
    /// This is a recoverable error - the account state remains unchanged.
    #[error("Insufficient funds in account {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Account that was asked to pay
        account: AccountId,
        /// Balance at the moment of the check
        available: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// A zero or negative amount was passed to credit/debit/transfer
    ///
    /// This is a caller logic error and is rejected before any guard is taken.
    #[error("Invalid amount {amount}: amounts must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// The account used on both sides
        account: AccountId,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to maintain account integrity.
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being written
        account: AccountId,
    },

    /// The async runtime could not be built or a task could not be joined
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },

    /// I/O error occurred while writing the report
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// The balance report could not be serialized
    #[error("Report error: {message}")]
    Report {
        /// Description of the serialization failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Report {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            available,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SameAccount error
    pub fn same_account(account: AccountId) -> Self {
        LedgerError::SameAccount { account }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        LedgerError::Runtime {
            message: message.into(),
        }
    }

    /// Whether this is the expected funds refusal rather than a fault
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, LedgerError::InsufficientFunds { .. })
    }
}

/// Reject non-positive amounts
///
/// Called at the top of every balance operation, before any guard is taken.
pub fn ensure_positive(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(LedgerError::invalid_amount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { account: AccountId(1), available: dec!(300), requested: dec!(500) },
        "Insufficient funds in account #1: available 300, requested 500"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: dec!(-5) },
        "Invalid amount -5: amounts must be positive"
    )]
    #[case::same_account(
        LedgerError::SameAccount { account: AccountId(7) },
        "Cannot transfer from account #7 to itself"
    )]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), account: AccountId(2) },
        "Arithmetic overflow in credit for account #2"
    )]
    #[case::runtime(
        LedgerError::Runtime { message: "no workers".to_string() },
        "Runtime error: no workers"
    )]
    #[case::io_error(
        LedgerError::Io { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds(AccountId(1), dec!(10), dec!(20)),
        LedgerError::InsufficientFunds { account: AccountId(1), available: dec!(10), requested: dec!(20) }
    )]
    #[case::same_account(
        LedgerError::same_account(AccountId(3)),
        LedgerError::SameAccount { account: AccountId(3) }
    )]
    #[case::arithmetic_overflow(
        LedgerError::arithmetic_overflow("transfer", AccountId(4)),
        LedgerError::ArithmeticOverflow { operation: "transfer".to_string(), account: AccountId(4) }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-0.01))]
    fn test_ensure_positive_rejects(#[case] amount: Decimal) {
        assert_eq!(ensure_positive(amount), Err(LedgerError::invalid_amount(amount)));
    }

    #[test]
    fn test_ensure_positive_accepts() {
        assert_eq!(ensure_positive(dec!(0.01)), Ok(dec!(0.01)));
    }

    #[test]
    fn test_is_insufficient_funds() {
        assert!(LedgerError::insufficient_funds(AccountId(1), dec!(0), dec!(1)).is_insufficient_funds());
        assert!(!LedgerError::invalid_amount(dec!(0)).is_insufficient_funds());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
