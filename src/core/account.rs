//! Guarded account balances
//!
//! This module provides the `Account` struct: a named, non-negative balance
//! with its own mutual-exclusion guard. It is the atomic unit of state in the
//! ledger.
//!
//! # Design
//!
//! The balance lives inside a `std::sync::Mutex` that is private to the
//! account. Callers outside the crate only ever see the guarded operations
//! (`credit`, `debit`, `balance`); the raw guard is reachable only by the
//! [`TransferCoordinator`](super::TransferCoordinator), which must hold two of
//! them at once.
//!
//! # Thread Safety
//!
//! Every operation on a single account is linearizable: credits and debits
//! are serialized by the guard, and `balance` reads under the same guard, so
//! no reader ever observes a value mid-mutation. Guards are held only for the
//! arithmetic itself, never across a sleep or an `.await`.

use crate::types::{ensure_positive, AccountId, AccountSnapshot, LedgerError};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A named balance with its own exclusive guard
///
/// Accounts are created by [`Ledger::open_account`](super::Ledger::open_account)
/// and shared through `Arc`. No actor owns an account exclusively.
#[derive(Debug)]
pub struct Account {
    /// Stable identity, also the lock-ordering key
    id: AccountId,

    /// Display name used in event lines and reports
    name: String,

    /// Current balance, never negative
    balance: Mutex<Decimal>,
}

impl Account {
    /// Create an account with an initial balance
    ///
    /// The caller guarantees `initial_balance >= 0` and a unique `id`.
    pub(crate) fn new(id: AccountId, name: impl Into<String>, initial_balance: Decimal) -> Self {
        Account {
            id,
            name: name.into(),
            balance: Mutex::new(initial_balance),
        }
    }

    /// The account's stable id
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The account's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the account's exclusive guard
    ///
    /// A poisoned guard is recovered: the balance is a plain value that is
    /// only ever replaced whole, so a panic elsewhere cannot leave it torn.
    pub(crate) fn guard(&self) -> MutexGuard<'_, Decimal> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add funds to the account
    ///
    /// # Arguments
    ///
    /// * `amount` - The amount to add (must be positive)
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The balance right after the credit
    /// * `Err(LedgerError::InvalidAmount)` - If `amount <= 0` (no guard taken)
    /// * `Err(LedgerError::ArithmeticOverflow)` - If the sum does not fit
    pub fn credit(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        let amount = ensure_positive(amount)?;

        let new_balance = {
            let mut balance = self.guard();
            let new_balance = balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("credit", self.id))?;
            *balance = new_balance;
            new_balance
        };

        info!(
            "credit: {} {} +{} -> {}",
            self.id, self.name, amount, new_balance
        );
        Ok(new_balance)
    }

    /// Remove funds from the account if the balance covers them
    ///
    /// The funds check and the subtraction happen under one guard, so two
    /// concurrent debits can never both pass the check on the same funds.
    ///
    /// # Arguments
    ///
    /// * `amount` - The amount to remove (must be positive)
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The balance right after the debit
    /// * `Err(LedgerError::InvalidAmount)` - If `amount <= 0` (no guard taken)
    /// * `Err(LedgerError::InsufficientFunds)` - If `balance < amount`; the
    ///   balance is left unchanged
    pub fn debit(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        let amount = ensure_positive(amount)?;

        let outcome = {
            let mut balance = self.guard();
            if *balance < amount {
                Err(LedgerError::insufficient_funds(self.id, *balance, amount))
            } else {
                *balance -= amount;
                Ok(*balance)
            }
        };

        match &outcome {
            Ok(new_balance) => info!(
                "debit: {} {} -{} -> {}",
                self.id, self.name, amount, new_balance
            ),
            Err(_) => warn!(
                "debit refused: {} {} cannot cover {}",
                self.id, self.name, amount
            ),
        }
        outcome
    }

    /// Read the balance under the guard
    pub fn balance(&self) -> Decimal {
        *self.guard()
    }

    /// Consistent snapshot of this account
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            name: self.name.clone(),
            balance: self.balance(),
        }
    }
}
