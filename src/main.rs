//! Concurrent Ledger Simulation CLI
//!
//! Runs the simulation until every customer has run out of money, the
//! configured duration elapses, or Ctrl-C is pressed.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --customers 10 --stores 3 --duration-secs 30
//! cargo run -- --rng-seed 42 --report balances.csv
//! ```
//!
//! Every credit, debit, transfer and refusal is logged as one line on stdout.
//! After shutdown the final balances are written as CSV to stdout, or to the
//! `--report` file.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging filter (default `info`; `warn` shows refusals only)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (runtime could not start, report could not be written)

use env_logger::{Env, Target};
use ledger_sim::{cli, write_balances_csv, LedgerError, Simulation};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), LedgerError> {
    let args = cli::parse_args();
    let config = args.to_simulation_config();

    let simulation = Simulation::new(config)?;
    let report = simulation.run_until_interrupted()?;

    for exit in report.customers.iter().chain(report.employees.iter()) {
        info!("{}: {:?} after {} cycles", exit.name, exit.reason, exit.cycles);
    }

    match &args.report {
        Some(path) => {
            let mut file = File::create(path)?;
            write_balances_csv(&report.balances, &mut file)?;
            file.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_balances_csv(&report.balances, &mut handle)?;
        }
    }

    Ok(())
}
