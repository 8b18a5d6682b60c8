//! I/O module
//!
//! Handles report output.
//!
//! # Components
//!
//! - `report` - CSV serialization of final account balances

pub mod report;

pub use report::write_balances_csv;
