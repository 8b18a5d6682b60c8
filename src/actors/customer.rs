//! Customer actor
//!
//! A customer repeatedly buys items paid from its own account and pauses for
//! a random think time after each purchase. The first refused purchase ends
//! the customer for good:
//!
//! ```text
//! Running --(purchase ok)--> Running
//! Running --(InsufficientFunds)--> Stopped
//! Running --(stop signal)--> Stopped
//! ```
//!
//! The purchase amount is drawn from the amounts the balance can cover at
//! draw time. Once none can be covered, the smallest amount is attempted and
//! refused, so a customer left alone always stops with less than the
//! smallest amount in its account.

use super::{Actor, Step};
use crate::core::Account;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Purchase behavior shared by all customers
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPolicy {
    /// Discrete purchase amounts (positive)
    pub purchase_amounts: Vec<Decimal>,

    /// Shortest pause after a purchase
    pub min_think_time: Duration,

    /// Longest pause after a purchase
    pub max_think_time: Duration,
}

impl Default for CustomerPolicy {
    fn default() -> Self {
        Self {
            purchase_amounts: vec![Decimal::from(100), Decimal::from(200)],
            min_think_time: Duration::from_millis(500),
            max_think_time: Duration::from_millis(1500),
        }
    }
}

/// A buyer spending down a single account
#[derive(Debug)]
pub struct Customer {
    name: String,
    account: Arc<Account>,
    /// Positive amounts, ascending
    amounts: Vec<Decimal>,
    min_think_time: Duration,
    max_think_time: Duration,
    rng: StdRng,
    purchases: u64,
}

impl Customer {
    /// Create a customer
    ///
    /// The policy is expected to have passed
    /// [`SimulationConfig::validated`](crate::simulation::SimulationConfig::validated).
    /// Amounts are sorted and deduplicated. `seed` fixes the random draws for
    /// reproducible runs.
    pub fn new(
        name: impl Into<String>,
        account: Arc<Account>,
        policy: &CustomerPolicy,
        seed: Option<u64>,
    ) -> Self {
        let mut amounts = policy.purchase_amounts.clone();
        amounts.sort();
        amounts.dedup();

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            name: name.into(),
            account,
            amounts,
            min_think_time: policy.min_think_time,
            max_think_time: policy.max_think_time,
            rng,
            purchases: 0,
        }
    }

    /// Successful purchases so far
    pub fn purchases(&self) -> u64 {
        self.purchases
    }

    fn smallest_amount(&self) -> Decimal {
        self.amounts.first().copied().unwrap_or(Decimal::ONE)
    }

    /// Pick the next purchase amount from what the balance can cover
    fn draw_amount(&mut self) -> Decimal {
        let balance = self.account.balance();
        let affordable: Vec<Decimal> = self
            .amounts
            .iter()
            .copied()
            .filter(|amount| *amount <= balance)
            .collect();

        match affordable.choose(&mut self.rng) {
            Some(amount) => *amount,
            None => self.smallest_amount(),
        }
    }

    fn think_time(&mut self) -> Duration {
        if self.min_think_time >= self.max_think_time {
            self.min_think_time
        } else {
            self.rng.gen_range(self.min_think_time..=self.max_think_time)
        }
    }
}

impl Actor for Customer {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self) -> Step {
        let amount = self.draw_amount();

        match self.account.debit(amount) {
            Ok(_) => {
                self.purchases += 1;
                Step::Continue(self.think_time())
            }
            Err(e) if e.is_insufficient_funds() => {
                info!("{} stops buying: {}", self.name, e);
                Step::Stop
            }
            Err(e) => {
                warn!("{} stops buying after unexpected error: {}", self.name, e);
                Step::Stop
            }
        }
    }

    fn cycles(&self) -> u64 {
        self.purchases
    }
}
