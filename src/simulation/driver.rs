//! Simulation driver
//!
//! The driver owns a run from start to finish:
//! 1. Builds the ledger and the account topology
//! 2. Spawns one tokio task per customer and per employee
//! 3. Spawns the settlement schedule task
//! 4. Waits for a shutdown trigger (all customers finished, the external
//!    shutdown future, or the configured duration)
//! 5. Cancels every task, joins them all, and only then snapshots balances
//!
//! # Architecture
//!
//! ```text
//! Simulation
//!     ├── Arc<Ledger>               (account registry)
//!     ├── Arc<TransferCoordinator>  (shared by employees and the schedule)
//!     ├── Topology                  (bank, stores, customers, employees)
//!     └── CancellationToken         (one stop signal for every task)
//! ```

use super::config::SimulationConfig;
use super::schedule::SettlementSchedule;
use super::topology::Topology;
use crate::actors::{run_actor, ActorExit, Customer, Employee, ExitReason};
use crate::core::{Ledger, TransferCoordinator};
use crate::types::{AccountSnapshot, LedgerError, TransferStats};
use futures::future::join_all;
use log::{error, info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownTrigger {
    /// Every customer stopped on its own
    CustomersFinished,

    /// The external shutdown future resolved (e.g. Ctrl-C)
    Signal,

    /// The configured duration elapsed
    Deadline,
}

/// Everything known about a run once all tasks have joined
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub trigger: ShutdownTrigger,

    /// Final balances, sorted by account id
    pub balances: Vec<AccountSnapshot>,

    /// Coordinator counters (employee and settlement transfers)
    pub transfers: TransferStats,

    /// Settlement rounds issued by the schedule
    pub settlement_rounds: u64,

    pub customers: Vec<ActorExit>,
    pub employees: Vec<ActorExit>,
}

/// A configured run, ready to start
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    ledger: Arc<Ledger>,
    coordinator: Arc<TransferCoordinator>,
    topology: Topology,
}

impl Simulation {
    /// Validate `config` and open every account
    pub fn new(config: SimulationConfig) -> Result<Self, LedgerError> {
        let config = config.validated();
        let ledger = Arc::new(Ledger::new());
        let topology = Topology::build(&ledger, &config)?;

        Ok(Self {
            config,
            ledger,
            coordinator: Arc::new(TransferCoordinator::new()),
            topology,
        })
    }

    /// The validated configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The account registry
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// The account topology
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Run on the current tokio runtime until a shutdown trigger fires
    ///
    /// `shutdown` is the external stop request; pass
    /// `std::future::pending()` to rely on the other triggers only.
    pub async fn run<F>(self, shutdown: F) -> SimulationReport
    where
        F: Future<Output = ()>,
    {
        let cancel = CancellationToken::new();

        info!(
            "starting simulation: {} customers, {} stores, {} employees",
            self.topology.customers.len(),
            self.topology.stores.len(),
            self.topology.employees.len()
        );

        let customer_tasks: Vec<(String, JoinHandle<ActorExit>)> = self
            .topology
            .customers
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                let seed = self.config.rng_seed.map(|seed| seed.wrapping_add(i as u64));
                let customer = Customer::new(
                    seat.name.clone(),
                    Arc::clone(&seat.account),
                    &self.config.customer,
                    seed,
                );
                let handle = tokio::spawn(run_actor(customer, cancel.child_token()));
                (seat.name.clone(), handle)
            })
            .collect();

        let employee_tasks: Vec<(String, JoinHandle<ActorExit>)> = self
            .topology
            .employees
            .iter()
            .map(|seat| {
                info!(
                    "{} starts at {} (salary {}, investment {})",
                    seat.name,
                    self.topology.stores[seat.store].name(),
                    seat.salary.id(),
                    seat.investment.id()
                );
                let employee = Employee::new(
                    seat.name.clone(),
                    Arc::clone(&seat.salary),
                    Arc::clone(&seat.investment),
                    Arc::clone(&self.coordinator),
                    self.config.employee.clone(),
                );
                let handle = tokio::spawn(run_actor(employee, cancel.child_token()));
                (seat.name.clone(), handle)
            })
            .collect();

        let schedule = SettlementSchedule::new(
            &self.topology,
            self.config.payroll_funding,
            Arc::clone(&self.coordinator),
        );
        let schedule_task = tokio::spawn(schedule.run(
            self.config.settlement_interval,
            cancel.child_token(),
        ));

        let deadline = async {
            match self.config.duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        let customers_done = join_actors(customer_tasks);
        tokio::pin!(customers_done);

        let (trigger, finished) = tokio::select! {
            exits = &mut customers_done => (ShutdownTrigger::CustomersFinished, Some(exits)),
            _ = shutdown => (ShutdownTrigger::Signal, None),
            _ = deadline => (ShutdownTrigger::Deadline, None),
        };

        info!("shutting down ({:?})", trigger);
        cancel.cancel();

        let customers = match finished {
            Some(exits) => exits,
            None => customers_done.await,
        };
        let employees = join_actors(employee_tasks).await;
        let settlement_rounds = match schedule_task.await {
            Ok(rounds) => rounds,
            Err(e) => {
                error!("settlement schedule task failed: {}", e);
                0
            }
        };

        let report = SimulationReport {
            trigger,
            balances: self.ledger.snapshot(),
            transfers: self.coordinator.stats(),
            settlement_rounds,
            customers,
            employees,
        };

        info!(
            "simulation finished: {} transfers completed, {} refused, {} settlement rounds",
            report.transfers.completed, report.transfers.refused, report.settlement_rounds
        );
        report
    }

    /// Build a multi-threaded runtime and run until Ctrl-C or another trigger
    pub fn run_until_interrupted(self) -> Result<SimulationReport, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| LedgerError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        Ok(runtime.block_on(self.run(ctrl_c())))
    }
}

/// Resolve on Ctrl-C; never resolve if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Await every actor task, turning a failed task into a `Panicked` exit
async fn join_actors(tasks: Vec<(String, JoinHandle<ActorExit>)>) -> Vec<ActorExit> {
    let (names, handles): (Vec<String>, Vec<JoinHandle<ActorExit>>) = tasks.into_iter().unzip();
    let results = join_all(handles).await;

    names
        .into_iter()
        .zip(results)
        .map(|(name, result)| match result {
            Ok(exit) => exit,
            Err(e) => {
                error!("{} task failed: {}", name, e);
                ActorExit {
                    name,
                    reason: ExitReason::Panicked,
                    cycles: 0,
                }
            }
        })
        .collect()
}
