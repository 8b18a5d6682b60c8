//! Balance report output
//!
//! Writes the final balances of a run as CSV with columns `id,name,balance`,
//! sorted by account id, balances rounded to two decimal places.

use crate::types::{AccountId, AccountSnapshot, LedgerError};
use rust_decimal::RoundingStrategy;
use serde::Serialize;
use std::io::Write;

/// One CSV row of the balance report
#[derive(Debug, Serialize, PartialEq)]
struct BalanceRow<'a> {
    id: AccountId,
    name: &'a str,
    balance: String,
}

/// Write account balances to CSV
///
/// # Arguments
///
/// * `balances` - Account snapshots to write (any order)
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError)` if serialization or a write failed
pub fn write_balances_csv(
    balances: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    let mut sorted: Vec<&AccountSnapshot> = balances.iter().collect();
    sorted.sort_by_key(|snapshot| snapshot.id);

    for snapshot in sorted {
        writer.serialize(BalanceRow {
            id: snapshot.id,
            name: &snapshot.name,
            balance: format!(
                "{:.2}",
                snapshot
                    .balance
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
        })?;
    }

    writer.flush()?;
    Ok(())
}
