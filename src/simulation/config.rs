//! Simulation configuration
//!
//! `SimulationConfig` carries every knob of a run. Its defaults reproduce the
//! classic topology: five customers with 1000 each, two stores with two
//! employees each, a 1400 salary with 20% invested.

use crate::actors::{CustomerPolicy, EmployeePolicy};
use log::warn;
use rust_decimal::Decimal;
use std::time::Duration;

/// Configuration for one simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of customers (and customer accounts)
    pub customers: usize,

    /// Number of stores (and store accounts)
    pub stores: usize,

    /// Employees attached to each store
    pub employees_per_store: usize,

    /// Seed balance of every customer account
    pub customer_seed_balance: Decimal,

    /// Purchase behavior of every customer
    pub customer: CustomerPolicy,

    /// Salary behavior of every employee
    pub employee: EmployeePolicy,

    /// Pause between settlement rounds
    pub settlement_interval: Duration,

    /// Amount each store forwards to the bank per settlement round
    pub payroll_funding: Decimal,

    /// Stop after this long even if customers are still buying
    pub duration: Option<Duration>,

    /// Base seed for customer draws; customer `i` uses `seed + i`
    pub rng_seed: Option<u64>,

    /// Worker threads of the async runtime
    pub worker_threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            customers: 5,
            stores: 2,
            employees_per_store: 2,
            customer_seed_balance: Decimal::from(1000),
            customer: CustomerPolicy::default(),
            employee: EmployeePolicy::default(),
            settlement_interval: Duration::from_millis(1000),
            payroll_funding: Decimal::from(100),
            duration: None,
            rng_seed: None,
            worker_threads: num_cpus::get(),
        }
    }
}

impl SimulationConfig {
    /// Replace invalid values with defaults
    ///
    /// Every replacement is reported with a warning. The result always
    /// satisfies: at least one customer and one store, non-negative seed
    /// balance, at least one purchase amount and all of them positive,
    /// ordered think times, positive salary and funding, an investment rate in `(0, 1]`,
    /// non-zero periods, and at least one worker thread.
    pub fn validated(mut self) -> Self {
        let default = Self::default();

        if self.customers == 0 {
            warn!(
                "Invalid customers ({}), using default ({})",
                self.customers, default.customers
            );
            self.customers = default.customers;
        }

        if self.stores == 0 {
            warn!(
                "Invalid stores ({}), using default ({})",
                self.stores, default.stores
            );
            self.stores = default.stores;
        }

        if self.customer_seed_balance < Decimal::ZERO {
            warn!(
                "Invalid customer seed balance ({}), using default ({})",
                self.customer_seed_balance, default.customer_seed_balance
            );
            self.customer_seed_balance = default.customer_seed_balance;
        }

        let amounts = &self.customer.purchase_amounts;
        if amounts.iter().any(|amount| *amount <= Decimal::ZERO) {
            warn!("Dropping non-positive purchase amounts from {:?}", amounts);
            self.customer
                .purchase_amounts
                .retain(|amount| *amount > Decimal::ZERO);
        }

        if self.customer.purchase_amounts.is_empty() {
            warn!(
                "No purchase amounts, using default ({:?})",
                default.customer.purchase_amounts
            );
            self.customer.purchase_amounts = default.customer.purchase_amounts.clone();
        }

        if self.customer.min_think_time > self.customer.max_think_time {
            warn!(
                "Inverted think times ({:?} > {:?}), swapping",
                self.customer.min_think_time, self.customer.max_think_time
            );
            std::mem::swap(
                &mut self.customer.min_think_time,
                &mut self.customer.max_think_time,
            );
        }

        if self.employee.salary <= Decimal::ZERO {
            warn!(
                "Invalid salary ({}), using default ({})",
                self.employee.salary, default.employee.salary
            );
            self.employee.salary = default.employee.salary;
        }

        let rate = self.employee.investment_rate;
        if rate <= Decimal::ZERO || rate > Decimal::ONE {
            warn!(
                "Invalid investment rate ({}), using default ({})",
                rate, default.employee.investment_rate
            );
            self.employee.investment_rate = default.employee.investment_rate;
        }

        if self.employee.period.is_zero() {
            warn!(
                "Invalid employee period (0), using default ({:?})",
                default.employee.period
            );
            self.employee.period = default.employee.period;
        }

        if self.settlement_interval.is_zero() {
            warn!(
                "Invalid settlement interval (0), using default ({:?})",
                default.settlement_interval
            );
            self.settlement_interval = default.settlement_interval;
        }

        if self.payroll_funding <= Decimal::ZERO {
            warn!(
                "Invalid payroll funding ({}), using default ({})",
                self.payroll_funding, default.payroll_funding
            );
            self.payroll_funding = default.payroll_funding;
        }

        if self.worker_threads == 0 {
            warn!(
                "Invalid worker_threads ({}), using default ({})",
                self.worker_threads, default.worker_threads
            );
            self.worker_threads = default.worker_threads;
        }

        self
    }
}
