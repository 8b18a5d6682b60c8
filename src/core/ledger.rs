//! Concurrent account registry
//!
//! This module provides the `Ledger` struct, which creates accounts, hands
//! out their stable ids, and lets any thread look them up.
//!
//! # Design
//!
//! Accounts are stored as `Arc<Account>` in a `DashMap`, so lookups from many
//! threads never contend on a single global lock. The map only guards
//! membership; balances are guarded by each account's own mutex, and map
//! shard locks are never held while an account guard is acquired.
//!
//! Ids come from an atomic counter and strictly increase, so the order in
//! which accounts are opened is also their lock order.

use super::account::Account;
use crate::types::{AccountId, AccountSnapshot, LedgerError};
use dashmap::DashMap;
use log::debug;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Registry of every account in the simulation
#[derive(Debug)]
pub struct Ledger {
    /// Accounts by id
    accounts: DashMap<AccountId, Arc<Account>>,

    /// Next id to hand out
    next_id: AtomicU32,
}

impl Ledger {
    /// Create an empty ledger
    ///
    /// The first account opened receives id `#1`.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Open a new account with an initial balance
    ///
    /// # Arguments
    ///
    /// * `name` - Display name for event lines and reports
    /// * `initial_balance` - Seed balance (zero or positive)
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Account>)` - The registered account
    /// * `Err(LedgerError::InvalidAmount)` - If the initial balance is negative
    pub fn open_account(
        &self,
        name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(initial_balance));
        }

        let id = AccountId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let account = Arc::new(Account::new(id, name, initial_balance));
        self.accounts.insert(id, Arc::clone(&account));

        debug!(
            "opened account {} {} with {}",
            id,
            account.name(),
            initial_balance
        );
        Ok(account)
    }

    /// Look up an account by id
    pub fn get(&self, id: AccountId) -> Option<Arc<Account>> {
        self.accounts.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account has been opened yet
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshot every account, sorted by id
    ///
    /// Each balance is read under its own guard. Accounts are read one after
    /// another, so the result is only a global picture once all writers have
    /// stopped.
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        // Collect handles first so no map shard is held while taking guards
        let mut accounts: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        accounts.sort_by_key(|account| account.id());

        accounts.iter().map(|account| account.snapshot()).collect()
    }

    /// Sum of all balances (see [`Ledger::snapshot`] for consistency)
    pub fn total_balance(&self) -> Decimal {
        self.snapshot().iter().map(|snapshot| snapshot.balance).sum()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
