//! Atomic two-account transfers
//!
//! This module provides the `TransferCoordinator`, which moves funds between
//! two [`Account`]s as one indivisible step.
//!
//! # Design
//!
//! Both account guards are acquired before either balance is touched, always
//! in ascending [`AccountId`](crate::types::AccountId) order regardless of
//! which account is the source. Because every transfer acquires guards in the
//! same relative order, no cycle of waiting transfers can form, so transfers
//! sharing zero or one account never deadlock.
//!
//! With both guards held, the funds check and both writes form one critical
//! section. A refused transfer writes nothing: there is no apply-then-undo
//! path, so no observer can see a debit without its credit.
//!
//! The coordinator never spawns work of its own; it runs on the caller's
//! thread.

use super::account::Account;
use crate::types::{ensure_positive, LedgerError, TransferReceipt, TransferStats};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::MutexGuard;

/// Moves funds between accounts under the global lock order
///
/// Shared through `Arc` by every actor that transfers. The only state it
/// carries is its outcome counters.
#[derive(Debug, Default)]
pub struct TransferCoordinator {
    /// Transfers applied to both accounts
    completed: AtomicU64,

    /// Transfers refused at the funds or overflow check
    refused: AtomicU64,
}

impl TransferCoordinator {
    /// Create a coordinator with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `amount` from `source` to `destination` atomically
    ///
    /// # Arguments
    ///
    /// * `source` - Account to debit
    /// * `destination` - Account to credit
    /// * `amount` - Amount to move (must be positive)
    ///
    /// # Returns
    ///
    /// * `Ok(TransferReceipt)` - Both balances changed; the receipt holds the
    ///   post-transfer balances read inside the critical section
    /// * `Err(LedgerError::InsufficientFunds)` - Neither balance changed
    /// * `Err(LedgerError::InvalidAmount)` / `Err(LedgerError::SameAccount)` -
    ///   Rejected before any guard is taken
    /// * `Err(LedgerError::ArithmeticOverflow)` - The credit would overflow;
    ///   neither balance changed
    pub fn transfer(
        &self,
        source: &Account,
        destination: &Account,
        amount: Decimal,
    ) -> Result<TransferReceipt, LedgerError> {
        let amount = ensure_positive(amount)?;
        if source.id() == destination.id() {
            return Err(LedgerError::same_account(source.id()));
        }

        let outcome = {
            let (mut source_balance, mut destination_balance) = lock_pair(source, destination);
            apply(source, destination, amount, &mut source_balance, &mut destination_balance)
        };

        match &outcome {
            Ok(receipt) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                info!(
                    "transfer: {} {} -> {} {} amount {} (balances {} / {})",
                    source.id(),
                    source.name(),
                    destination.id(),
                    destination.name(),
                    amount,
                    receipt.source_balance,
                    receipt.destination_balance
                );
            }
            Err(e) => {
                self.refused.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "transfer refused: {} {} -> {} {} amount {}: {}",
                    source.id(),
                    source.name(),
                    destination.id(),
                    destination.name(),
                    amount,
                    e
                );
            }
        }
        outcome
    }

    /// Snapshot of the outcome counters
    pub fn stats(&self) -> TransferStats {
        TransferStats {
            completed: self.completed.load(Ordering::Relaxed),
            refused: self.refused.load(Ordering::Relaxed),
        }
    }
}

/// Acquire both guards in ascending id order
///
/// Returns the guards as `(source, destination)` whatever order they were
/// taken in. The ids are distinct; the caller has already rejected
/// self-transfers.
fn lock_pair<'a>(
    source: &'a Account,
    destination: &'a Account,
) -> (MutexGuard<'a, Decimal>, MutexGuard<'a, Decimal>) {
    if source.id() < destination.id() {
        let source_guard = source.guard();
        let destination_guard = destination.guard();
        (source_guard, destination_guard)
    } else {
        let destination_guard = destination.guard();
        let source_guard = source.guard();
        (source_guard, destination_guard)
    }
}

/// Funds check and both writes, with both guards held
///
/// Every fallible step runs before the first write.
fn apply(
    source: &Account,
    destination: &Account,
    amount: Decimal,
    source_balance: &mut Decimal,
    destination_balance: &mut Decimal,
) -> Result<TransferReceipt, LedgerError> {
    if *source_balance < amount {
        return Err(LedgerError::insufficient_funds(
            source.id(),
            *source_balance,
            amount,
        ));
    }

    let new_destination = destination_balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", destination.id()))?;
    let new_source = *source_balance - amount;

    *source_balance = new_source;
    *destination_balance = new_destination;

    Ok(TransferReceipt {
        source: source.id(),
        destination: destination.id(),
        amount,
        source_balance: new_source,
        destination_balance: new_destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_capture::capture;
    use crate::types::AccountId;
    use log::Level;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};

    fn account(id: u32, balance: Decimal) -> Arc<Account> {
        Arc::new(Account::new(AccountId(id), format!("Account{}", id), balance))
    }

    #[test]
    fn test_transfer_moves_funds() {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(1000));
        let b = account(2, dec!(0));

        let receipt = coordinator.transfer(&a, &b, dec!(700)).unwrap();

        assert_eq!(receipt.source, AccountId(1));
        assert_eq!(receipt.destination, AccountId(2));
        assert_eq!(receipt.amount, dec!(700));
        assert_eq!(receipt.source_balance, dec!(300));
        assert_eq!(receipt.destination_balance, dec!(700));
        assert_eq!(a.balance(), dec!(300));
        assert_eq!(b.balance(), dec!(700));
        assert_eq!(coordinator.stats(), TransferStats { completed: 1, refused: 0 });
    }

    #[test]
    fn test_transfer_against_lock_order_moves_funds() {
        // Source has the higher id, so the destination guard is taken first
        let coordinator = TransferCoordinator::new();
        let low = account(1, dec!(0));
        let high = account(2, dec!(250));

        coordinator.transfer(&high, &low, dec!(250)).unwrap();

        assert_eq!(high.balance(), dec!(0));
        assert_eq!(low.balance(), dec!(250));
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(300));
        let b = account(2, dec!(40));

        let result = coordinator.transfer(&a, &b, dec!(500));

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(AccountId(1), dec!(300), dec!(500)))
        );
        assert_eq!(a.balance(), dec!(300));
        assert_eq!(b.balance(), dec!(40));
        assert_eq!(coordinator.stats(), TransferStats { completed: 0, refused: 1 });
    }

    #[test]
    fn test_overflow_changes_nothing() {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(10));
        let b = account(2, Decimal::MAX);

        let result = coordinator.transfer(&a, &b, dec!(5));

        assert_eq!(
            result,
            Err(LedgerError::arithmetic_overflow("transfer", AccountId(2)))
        );
        assert_eq!(a.balance(), dec!(10));
        assert_eq!(b.balance(), Decimal::MAX);
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-100))]
    fn test_invalid_amount_rejected_without_counting(#[case] amount: Decimal) {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(100));
        let b = account(2, dec!(100));

        let result = coordinator.transfer(&a, &b, amount);

        assert_eq!(result, Err(LedgerError::invalid_amount(amount)));
        assert_eq!(coordinator.stats().attempted(), 0);
    }

    #[test]
    fn test_self_transfer_rejected() {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(100));

        let result = coordinator.transfer(&a, &a, dec!(10));

        assert_eq!(result, Err(LedgerError::same_account(AccountId(1))));
        assert_eq!(a.balance(), dec!(100));
    }

    #[rstest]
    #[case::exact_balance(dec!(500), dec!(500))]
    #[case::partial(dec!(500), dec!(123.45))]
    fn test_conservation_across_successful_transfer(
        #[case] initial: Decimal,
        #[case] amount: Decimal,
    ) {
        let coordinator = TransferCoordinator::new();
        let a = account(1, initial);
        let b = account(2, dec!(77));
        let before = a.balance() + b.balance();

        coordinator.transfer(&a, &b, amount).unwrap();

        assert_eq!(a.balance() + b.balance(), before);
    }

    #[test]
    fn test_competing_transfers_exactly_one_wins() {
        // A starts at 1000; transfer(A, B, 700) races transfer(A, C, 500)
        for _ in 0..200 {
            let coordinator = Arc::new(TransferCoordinator::new());
            let a = account(1, dec!(1000));
            let b = account(2, dec!(0));
            let c = account(3, dec!(0));
            let barrier = Arc::new(Barrier::new(2));

            let spawn = |destination: Arc<Account>, amount: Decimal| {
                let coordinator = Arc::clone(&coordinator);
                let source = Arc::clone(&a);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    coordinator.transfer(&source, &destination, amount)
                })
            };

            let to_b = spawn(Arc::clone(&b), dec!(700));
            let to_c = spawn(Arc::clone(&c), dec!(500));
            let to_b = to_b.join().unwrap();
            let to_c = to_c.join().unwrap();

            match (&to_b, &to_c) {
                (Ok(_), Err(e)) => {
                    assert!(e.is_insufficient_funds());
                    assert_eq!(a.balance(), dec!(300));
                    assert_eq!(b.balance(), dec!(700));
                    assert_eq!(c.balance(), dec!(0));
                }
                (Err(e), Ok(_)) => {
                    assert!(e.is_insufficient_funds());
                    assert_eq!(a.balance(), dec!(500));
                    assert_eq!(b.balance(), dec!(0));
                    assert_eq!(c.balance(), dec!(500));
                }
                other => panic!("Expected exactly one success, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_opposite_order_transfers_do_not_deadlock() {
        let coordinator = Arc::new(TransferCoordinator::new());
        let a = account(1, dec!(1000));
        let b = account(2, dec!(1000));
        let start = Instant::now();

        let mut handles = vec![];
        for i in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            let (from, to) = if i % 2 == 0 {
                (Arc::clone(&a), Arc::clone(&b))
            } else {
                (Arc::clone(&b), Arc::clone(&a))
            };
            handles.push(thread::spawn(move || {
                for _ in 0..2_000 {
                    let _ = coordinator.transfer(&from, &to, dec!(1));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(a.balance() + b.balance(), dec!(2000));
        assert_eq!(coordinator.stats().attempted(), 16_000);
    }

    #[test]
    fn test_transfer_ring_conserves_total_and_stays_non_negative() {
        // Each thread pushes funds around a ring in its own direction
        let coordinator = Arc::new(TransferCoordinator::new());
        let accounts: Vec<Arc<Account>> = (1..=5).map(|id| account(id, dec!(200))).collect();

        let mut handles = vec![];
        for t in 0..10usize {
            let coordinator = Arc::clone(&coordinator);
            let accounts = accounts.clone();
            handles.push(thread::spawn(move || {
                for step in 0..1_000usize {
                    let i = (t + step) % accounts.len();
                    let j = if t % 2 == 0 {
                        (i + 1) % accounts.len()
                    } else {
                        (i + accounts.len() - 1) % accounts.len()
                    };
                    let amount = Decimal::from((step % 7 + 1) as u32 * 10);
                    let _ = coordinator.transfer(&accounts[i], &accounts[j], amount);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let total: Decimal = accounts.iter().map(|a| a.balance()).sum();
        assert_eq!(total, dec!(1000));
        assert!(accounts.iter().all(|a| a.balance() >= Decimal::ZERO));
    }

    #[test]
    fn test_observer_never_sees_half_applied_transfer() {
        // A reader holding both guards in lock order must always see the sum intact
        let coordinator = Arc::new(TransferCoordinator::new());
        let a = account(1, dec!(500));
        let b = account(2, dec!(500));

        let writer = {
            let coordinator = Arc::clone(&coordinator);
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            thread::spawn(move || {
                for i in 0..5_000 {
                    if i % 2 == 0 {
                        let _ = coordinator.transfer(&a, &b, dec!(3));
                    } else {
                        let _ = coordinator.transfer(&b, &a, dec!(3));
                    }
                }
            })
        };

        for _ in 0..5_000 {
            let (first, second) = lock_pair(&a, &b);
            assert_eq!(*first + *second, dec!(1000));
        }

        writer.join().unwrap();
    }

    #[test]
    fn test_each_transfer_outcome_logs_one_line() {
        let coordinator = TransferCoordinator::new();
        let a = account(1, dec!(100));
        let b = account(2, dec!(0));

        let (_, completed) = capture(|| coordinator.transfer(&a, &b, dec!(60)).unwrap());
        let (_, refused) = capture(|| coordinator.transfer(&a, &b, dec!(60)).unwrap_err());

        // No separate credit or debit lines for the two legs
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].0, Level::Info);
        assert!(completed[0].1.starts_with("transfer: #1 Account1 -> #2 Account2 amount 60"));

        assert_eq!(refused.len(), 1);
        assert_eq!(refused[0].0, Level::Warn);
        assert!(refused[0].1.starts_with("transfer refused: #1 Account1 -> #2 Account2"));
    }
}
