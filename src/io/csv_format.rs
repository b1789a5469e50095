//! CSV format handling for operation scripts and account reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to operation records
//! - Summary and statement output for final account states
//!
//! All functions are pure (no I/O beyond the writer they are handed).

use crate::core::statement::money;
use crate::core::Account;
use crate::types::{LedgerError, OperationRecord, OperationType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the script columns: op, account, target, amount, owner.
/// Only `op` and `account` are present on every row; the others depend on
/// the operation.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    pub target: Option<String>,
    pub amount: Option<String>,
    pub owner: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation name (case-insensitive, `withdrawal` accepted)
/// - Parses the amount column into a Decimal when present
/// - Treats blank optional columns as absent
///
/// Whether an operation has the fields it needs is checked when the record
/// is applied, so a `deposit` without an amount converts fine here and is
/// rejected with `MissingField` later.
///
/// # Returns
///
/// * `Ok(OperationRecord)` - Successfully converted record
/// * `Err(LedgerError)` - `InvalidOperation`, `InvalidAccountNumber`, or a
///   `ParseError` for an unparseable amount
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, LedgerError> {
    let op = OperationType::parse(csv_record.op.trim()).ok_or_else(|| LedgerError::InvalidOperation {
        op: csv_record.op.clone(),
    })?;

    let account = csv_record.account.trim();
    if account.is_empty() {
        return Err(LedgerError::InvalidAccountNumber);
    }

    let mut record = OperationRecord::new(op, account);

    if let Some(amount_str) = non_blank(csv_record.amount) {
        let amount = Decimal::from_str(&amount_str).map_err(|_| LedgerError::ParseError {
            line: None,
            message: format!(
                "Invalid amount '{}' for {} on account {}",
                amount_str,
                op.name(),
                account
            ),
        })?;
        record = record.with_amount(amount);
    }
    if let Some(target) = non_blank(csv_record.target) {
        record = record.with_target(target);
    }
    if let Some(owner) = non_blank(csv_record.owner) {
        record = record.with_owner(owner);
    }

    Ok(record)
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Write the final account states as a summary CSV
///
/// Columns: account, owner, balance, debt, minimum, status.
/// Accounts are sorted by account number for deterministic output and
/// amounts are written to two decimal places.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "owner", "balance", "debt", "minimum", "status"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.account_number().cmp(b.account_number()));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.account_number().to_string(),
                account.owner_name().to_string(),
                money(account.balance()),
                money(account.outstanding_debt()),
                money(account.minimum_balance()),
                account.status().to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the full statement of every account, separated by blank lines
pub fn write_statements(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.account_number().cmp(b.account_number()));

    for (index, account) in sorted_accounts.into_iter().enumerate() {
        if index > 0 {
            writeln!(output).map_err(|e| format!("Failed to write statement: {}", e))?;
        }
        writeln!(output, "{}", account.statement())
            .map_err(|e| format!("Failed to write statement: {}", e))?;
    }

    output
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
