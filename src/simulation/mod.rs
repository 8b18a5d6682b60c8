//! Simulation module
//!
//! Glue around the ledger core: configuration, account topology, the
//! settlement schedule, and the driver that starts and stops every task.

pub mod config;
pub mod driver;
pub mod schedule;
pub mod topology;

pub use config::SimulationConfig;
pub use driver::{ShutdownTrigger, Simulation, SimulationReport};
pub use schedule::{SettlementSchedule, SETTLEMENT_PATTERN};
pub use topology::Topology;
