//! Employee actor
//!
//! Every period an employee:
//! 1. credits its salary account with the fixed salary,
//! 2. computes the investment as a fixed share of the investment basis,
//! 3. transfers the investment from the salary account to its investment
//!    account through the [`TransferCoordinator`].
//!
//! A refused transfer (another withdrawal drained the salary account first)
//! skips that period's investment. Employees never stop on their own; only the
//! stop signal ends them.

use super::{Actor, Step};
use crate::core::{Account, TransferCoordinator};
use clap::ValueEnum;
use log::{debug, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use std::time::Duration;

/// What the investment rate is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InvestmentBasis {
    /// The salary account balance read right after the salary credit
    #[default]
    Balance,

    /// The salary amount alone
    Salary,
}

/// Salary and investment behavior shared by all employees
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeePolicy {
    /// Amount credited every period
    pub salary: Decimal,

    /// Share of the basis moved to investments, in `(0, 1]`
    pub investment_rate: Decimal,

    /// What the rate applies to
    pub basis: InvestmentBasis,

    /// Pause between periods
    pub period: Duration,
}

impl Default for EmployeePolicy {
    fn default() -> Self {
        Self {
            salary: Decimal::from(1400),
            investment_rate: Decimal::new(2, 1),
            basis: InvestmentBasis::Balance,
            period: Duration::from_millis(1000),
        }
    }
}

/// A salaried worker investing part of each pay
#[derive(Debug)]
pub struct Employee {
    name: String,
    salary_account: Arc<Account>,
    investment_account: Arc<Account>,
    coordinator: Arc<TransferCoordinator>,
    policy: EmployeePolicy,
    invested: u64,
    skipped: u64,
}

impl Employee {
    /// Create an employee over a salary/investment account pair
    pub fn new(
        name: impl Into<String>,
        salary_account: Arc<Account>,
        investment_account: Arc<Account>,
        coordinator: Arc<TransferCoordinator>,
        policy: EmployeePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            salary_account,
            investment_account,
            coordinator,
            policy,
            invested: 0,
            skipped: 0,
        }
    }

    /// Periods whose investment transfer went through
    pub fn invested_cycles(&self) -> u64 {
        self.invested
    }

    /// Periods whose investment was skipped
    pub fn skipped_cycles(&self) -> u64 {
        self.skipped
    }

    /// Investment for the current period, truncated to cents
    ///
    /// Truncation keeps the amount at or below its basis, so a rate of 1 on
    /// a sub-cent balance never asks for more than the account holds.
    fn investment_amount(&self) -> Decimal {
        let basis = match self.policy.basis {
            InvestmentBasis::Balance => self.salary_account.balance(),
            InvestmentBasis::Salary => self.policy.salary,
        };
        (basis * self.policy.investment_rate)
            .round_dp_with_strategy(2, RoundingStrategy::ToZero)
    }

    fn skip(&mut self) -> Step {
        self.skipped += 1;
        Step::Continue(self.policy.period)
    }
}

impl Actor for Employee {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self) -> Step {
        if let Err(e) = self.salary_account.credit(self.policy.salary) {
            warn!("{} was not paid this period: {}", self.name, e);
            return self.skip();
        }

        let amount = self.investment_amount();
        if amount <= Decimal::ZERO {
            debug!("{} has nothing to invest this period", self.name);
            return self.skip();
        }

        match self
            .coordinator
            .transfer(&self.salary_account, &self.investment_account, amount)
        {
            Ok(_) => {
                self.invested += 1;
                Step::Continue(self.policy.period)
            }
            Err(e) if e.is_insufficient_funds() => {
                info!("{} skips this period's investment: {}", self.name, e);
                self.skip()
            }
            Err(e) => {
                warn!("{} skips this period's investment: {}", self.name, e);
                self.skip()
            }
        }
    }

    fn cycles(&self) -> u64 {
        self.invested
    }
}
