use crate::actors::{CustomerPolicy, EmployeePolicy, InvestmentBasis};
use crate::simulation::SimulationConfig;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Simulate customers, stores and employees sharing a concurrent ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-sim")]
#[command(about = "Simulate customers, stores and employees sharing a concurrent ledger", long_about = None)]
pub struct CliArgs {
    /// Number of customers
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    pub customers: usize,

    /// Number of stores
    #[arg(long, value_name = "COUNT", default_value_t = 2)]
    pub stores: usize,

    /// Employees per store
    #[arg(long = "employees-per-store", value_name = "COUNT", default_value_t = 2)]
    pub employees_per_store: usize,

    /// Seed balance of each customer account
    #[arg(long = "seed-balance", value_name = "AMOUNT", default_value = "1000")]
    pub seed_balance: Decimal,

    /// Purchase amounts customers choose from
    #[arg(
        long = "purchase-amount",
        value_name = "AMOUNT",
        num_args = 1..,
        default_values_t = [Decimal::from(100), Decimal::from(200)]
    )]
    pub purchase_amounts: Vec<Decimal>,

    /// Shortest customer pause after a purchase, in milliseconds
    #[arg(long = "min-think-ms", value_name = "MS", default_value_t = 500)]
    pub min_think_ms: u64,

    /// Longest customer pause after a purchase, in milliseconds
    #[arg(long = "max-think-ms", value_name = "MS", default_value_t = 1500)]
    pub max_think_ms: u64,

    /// Salary credited to each employee every period
    #[arg(long, value_name = "AMOUNT", default_value = "1400")]
    pub salary: Decimal,

    /// Share of the investment basis moved to investments, in (0, 1]
    #[arg(long = "investment-rate", value_name = "RATE", default_value = "0.2")]
    pub investment_rate: Decimal,

    /// What the investment rate applies to
    #[arg(long = "investment-basis", value_name = "BASIS", default_value = "balance")]
    pub investment_basis: InvestmentBasis,

    /// Employee period in milliseconds
    #[arg(long = "employee-period-ms", value_name = "MS", default_value_t = 1000)]
    pub employee_period_ms: u64,

    /// Pause between settlement rounds in milliseconds
    #[arg(long = "settlement-interval-ms", value_name = "MS", default_value_t = 1000)]
    pub settlement_interval_ms: u64,

    /// Amount each store forwards to the bank per settlement round
    #[arg(long = "payroll-funding", value_name = "AMOUNT", default_value = "100")]
    pub payroll_funding: Decimal,

    /// Stop after this many seconds even if customers are still buying
    #[arg(long = "duration-secs", value_name = "SECS")]
    pub duration_secs: Option<u64>,

    /// Seed for reproducible purchase draws
    #[arg(long = "rng-seed", value_name = "SEED")]
    pub rng_seed: Option<u64>,

    /// Worker threads of the async runtime (default: CPU cores)
    #[arg(long = "worker-threads", value_name = "COUNT")]
    pub worker_threads: Option<usize>,

    /// Write the final balance report here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl CliArgs {
    /// Create a SimulationConfig from CLI arguments
    ///
    /// Invalid values are replaced with defaults by
    /// [`SimulationConfig::validated`], with a warning for each.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let default = SimulationConfig::default();

        SimulationConfig {
            customers: self.customers,
            stores: self.stores,
            employees_per_store: self.employees_per_store,
            customer_seed_balance: self.seed_balance,
            customer: CustomerPolicy {
                purchase_amounts: self.purchase_amounts.clone(),
                min_think_time: Duration::from_millis(self.min_think_ms),
                max_think_time: Duration::from_millis(self.max_think_ms),
            },
            employee: EmployeePolicy {
                salary: self.salary,
                investment_rate: self.investment_rate,
                basis: self.investment_basis,
                period: Duration::from_millis(self.employee_period_ms),
            },
            settlement_interval: Duration::from_millis(self.settlement_interval_ms),
            payroll_funding: self.payroll_funding,
            duration: self.duration_secs.map(Duration::from_secs),
            rng_seed: self.rng_seed,
            worker_threads: self.worker_threads.unwrap_or(default.worker_threads),
        }
        .validated()
    }
}
