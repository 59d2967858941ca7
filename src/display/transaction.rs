//! Transaction display formatting

use crate::models::{Account, Transaction};
use crate::services::{ImportPreviewEntry, ImportResult, ImportStatus};

use super::report::{money, truncate};

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, currency: &str) -> String {
    let description = if txn.description.is_empty() {
        "(no description)"
    } else {
        txn.description.as_str()
    };

    format!(
        "{:<12} {} {:<8} {:<24} {:<16} {:>12}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        txn.kind,
        truncate(description, 24),
        truncate(txn.category_value().unwrap_or("-"), 16),
        money(txn.amount, currency)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction], currency: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<8} {:<24} {:<16} {:>12}\n",
        "ID", "Date", "Type", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, currency));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
///
/// `account` is the stored account behind `txn.account_id`, when it exists.
pub fn format_transaction_details(
    txn: &Transaction,
    account: Option<&Account>,
    currency: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Amount:      {}\n", money(txn.amount, currency)));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    match txn.category_value() {
        Some(value) => output.push_str(&format!("Category:    {}\n", value)),
        None => output.push_str("Category:    (uncategorized)\n"),
    }

    match (account, txn.account_id) {
        (Some(account), _) => output.push_str(&format!("Account:     {}\n", account)),
        (None, Some(id)) => output.push_str(&format!("Account:     {} (deleted)\n", id)),
        (None, None) => {}
    }
    if let Some(import_id) = &txn.import_id {
        output.push_str(&format!("Import ID:   {}\n", import_id));
    }

    output
}

/// Format an import preview, one line per row
pub fn format_import_preview(preview: &[ImportPreviewEntry], currency: &str) -> String {
    let mut output = String::new();

    for entry in preview {
        let status = match &entry.status {
            ImportStatus::New => "new".to_string(),
            ImportStatus::Duplicate => "duplicate".to_string(),
            ImportStatus::Error(message) => format!("error: {}", message),
        };

        match &entry.transaction {
            Some(txn) => output.push_str(&format!(
                "{:>4}  {}  {:<8} {:<24} {:>12}  {}\n",
                entry.row_number,
                txn.date.format("%Y-%m-%d"),
                txn.kind,
                truncate(&txn.description, 24),
                money(txn.amount, currency),
                status
            )),
            None => output.push_str(&format!("{:>4}  {}\n", entry.row_number, status)),
        }
    }

    output
}

/// Summarize a finished import
pub fn format_import_result(result: &ImportResult) -> String {
    let mut output = format!(
        "Imported {} transaction(s), skipped {} duplicate(s), {} error(s).\n",
        result.imported, result.duplicates_skipped, result.errors
    );

    if result.unknown_categories > 0 {
        output.push_str(&format!(
            "{} row(s) named an unknown category and were left uncategorized or given the default.\n",
            result.unknown_categories
        ));
    }
    for (row, message) in &result.error_messages {
        output.push_str(&format!("  row {}: {}\n", row, message));
    }

    output
}
