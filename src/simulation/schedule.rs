//! Deterministic settlement schedule
//!
//! Every round settles customer purchases into store accounts, then funds
//! payroll by moving money from every store to the bank. Each transfer goes
//! through the [`TransferCoordinator`]; refusals are counted and the round
//! carries on.
//!
//! Customer `i` (1-based) pays store `((i - 1) mod stores) + 1` the amount
//! `SETTLEMENT_PATTERN[(i - 1) mod 5]`.

use super::topology::Topology;
use crate::core::{Account, TransferCoordinator};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Settlement amounts, cycled over customers
pub const SETTLEMENT_PATTERN: [u32; 5] = [100, 200, 200, 100, 100];

/// One fixed transfer of the schedule
#[derive(Debug, Clone)]
pub struct ScheduledTransfer {
    pub source: Arc<Account>,
    pub destination: Arc<Account>,
    pub amount: Decimal,
}

/// Outcome counts of one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub completed: usize,
    pub refused: usize,
}

/// The driver's repeating transfer loop
#[derive(Debug)]
pub struct SettlementSchedule {
    transfers: Vec<ScheduledTransfer>,
    coordinator: Arc<TransferCoordinator>,
}

impl SettlementSchedule {
    /// Build the fixed transfer sequence for a topology
    pub fn new(
        topology: &Topology,
        payroll_funding: Decimal,
        coordinator: Arc<TransferCoordinator>,
    ) -> Self {
        let mut transfers = Vec::new();

        if !topology.stores.is_empty() {
            for (i, seat) in topology.customers.iter().enumerate() {
                let store = &topology.stores[i % topology.stores.len()];
                transfers.push(ScheduledTransfer {
                    source: Arc::clone(&seat.account),
                    destination: Arc::clone(store),
                    amount: Decimal::from(SETTLEMENT_PATTERN[i % SETTLEMENT_PATTERN.len()]),
                });
            }
        }

        for store in &topology.stores {
            transfers.push(ScheduledTransfer {
                source: Arc::clone(store),
                destination: Arc::clone(&topology.bank),
                amount: payroll_funding,
            });
        }

        Self {
            transfers,
            coordinator,
        }
    }

    /// The transfers of one round, in execution order
    pub fn transfers(&self) -> &[ScheduledTransfer] {
        &self.transfers
    }

    /// Issue every transfer of the schedule once
    pub fn run_round(&self) -> RoundOutcome {
        let mut outcome = RoundOutcome::default();

        for transfer in &self.transfers {
            match self
                .coordinator
                .transfer(&transfer.source, &transfer.destination, transfer.amount)
            {
                Ok(_) => outcome.completed += 1,
                Err(e) if e.is_insufficient_funds() => outcome.refused += 1,
                Err(e) => {
                    warn!("scheduled transfer failed: {}", e);
                    outcome.refused += 1;
                }
            }
        }

        outcome
    }

    /// Run rounds every `interval` until `cancel` fires
    ///
    /// The first round runs immediately. Returns the number of rounds run.
    pub async fn run(self, interval: Duration, cancel: CancellationToken) -> u64 {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rounds = 0u64;

        info!("settlement schedule started ({} transfers per round)", self.transfers.len());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let outcome = self.run_round();
                    rounds += 1;
                    debug!(
                        "settlement round {}: {} completed, {} refused",
                        rounds, outcome.completed, outcome.refused
                    );
                }
            }
        }

        info!("settlement schedule stopped after {} rounds", rounds);
        rounds
    }
}
