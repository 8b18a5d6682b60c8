//! Concurrent Ledger Simulation Library
//! # Overview
//!
//! This library models customers, employees and stores that read and mutate
//! shared balances concurrently while a central schedule settles funds
//! between accounts.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Value types (AccountId, snapshots, receipts, errors)
//! - [`core`] - The ledger core:
//!   - [`core::account`] - Guarded balances (credit, debit, balance)
//!   - [`core::coordinator`] - Atomic two-account transfers
//!   - [`core::ledger`] - Concurrent account registry
//! - [`actors`] - Customer and employee behaviors and the cancellable runner
//! - [`simulation`] - Configuration, topology, settlement schedule, driver
//! - [`io`] - Balance report output
//! - [`cli`] - CLI arguments parsing
//!
//! # Guarantees
//!
//! - No balance is ever negative: debits and transfers are refused instead
//! - A transfer changes both accounts or neither; no observer sees half of it
//! - Transfers acquire account guards in ascending id order, so they never
//!   deadlock, whatever the direction of concurrent transfers
//! - `InsufficientFunds` is an ordinary `Err` value handled by the caller

// Module declarations
pub mod actors;
pub mod cli;
pub mod core;
pub mod io;
pub mod simulation;
pub mod types;

pub use core::{Account, Ledger, TransferCoordinator};
pub use io::write_balances_csv;
pub use simulation::{Simulation, SimulationConfig, SimulationReport};
pub use types::{AccountId, AccountSnapshot, LedgerError, TransferReceipt, TransferStats};
