//! Account topology
//!
//! Opens every account a run needs, in a fixed order so ids (and therefore
//! lock order) are the same on every run:
//!
//! ```text
//! #1            Bank
//! #2..          Store1..StoreN
//! then          Customer1 account..CustomerN account
//! then          Employee{e}Store{s} salary / investment, pairwise
//! ```

use super::config::SimulationConfig;
use crate::core::{Account, Ledger};
use crate::types::LedgerError;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A customer's name and the account it pays from
#[derive(Debug, Clone)]
pub struct CustomerSeat {
    pub name: String,
    pub account: Arc<Account>,
}

/// An employee's name, store, and account pair
#[derive(Debug, Clone)]
pub struct EmployeeSeat {
    pub name: String,
    /// Index into [`Topology::stores`]
    pub store: usize,
    pub salary: Arc<Account>,
    pub investment: Arc<Account>,
}

/// Every account of a run, grouped by role
#[derive(Debug, Clone)]
pub struct Topology {
    /// Central bank account funded by the stores
    pub bank: Arc<Account>,
    pub stores: Vec<Arc<Account>>,
    pub customers: Vec<CustomerSeat>,
    pub employees: Vec<EmployeeSeat>,
}

impl Topology {
    /// Open all accounts described by `config` in `ledger`
    pub fn build(ledger: &Ledger, config: &SimulationConfig) -> Result<Self, LedgerError> {
        let bank = ledger.open_account("Bank", Decimal::ZERO)?;

        let stores = (1..=config.stores)
            .map(|s| ledger.open_account(format!("Store{}", s), Decimal::ZERO))
            .collect::<Result<Vec<_>, _>>()?;

        let customers = (1..=config.customers)
            .map(|c| {
                let name = format!("Customer{}", c);
                let account = ledger.open_account(
                    format!("{} account", name),
                    config.customer_seed_balance,
                )?;
                Ok(CustomerSeat { name, account })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let mut employees = Vec::with_capacity(config.stores * config.employees_per_store);
        for s in 1..=config.stores {
            for e in 1..=config.employees_per_store {
                let name = format!("Employee{}Store{}", e, s);
                let salary = ledger.open_account(format!("{} salary", name), Decimal::ZERO)?;
                let investment =
                    ledger.open_account(format!("{} investment", name), Decimal::ZERO)?;
                employees.push(EmployeeSeat {
                    name,
                    store: s - 1,
                    salary,
                    investment,
                });
            }
        }

        Ok(Self {
            bank,
            stores,
            customers,
            employees,
        })
    }
}
