//! Account display formatting
//!
//! Balances are printed with the account's own currency code, since accounts
//! may hold different currencies.

use crate::models::{Account, Money};

fn balance(account: &Account) -> String {
    format!("{} {}", account.balance.format_with_symbol(""), account.currency)
}

/// Format accounts as a table
///
/// A total row is added when every account uses the same currency.
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n\nAdd one with 'planner account add <name>'.\n".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<nw$}  {:<10}  {:>16}\n",
        "ID",
        "Name",
        "Type",
        "Balance",
        nw = name_width
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<nw$}  {:-<10}  {:->16}\n",
        "",
        "",
        "",
        "",
        nw = name_width
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<12}  {:<nw$}  {:<10}  {:>16}\n",
            account.id.to_string(),
            account.name,
            account.account_type,
            balance(account),
            nw = name_width
        ));
    }

    let currency = &accounts[0].currency;
    if accounts.len() > 1 && accounts.iter().all(|a| &a.currency == currency) {
        let total: Money = accounts.iter().map(|a| a.balance).sum();
        output.push_str(&format!(
            "{:<12}  {:<nw$}  {:<10}  {:>16}\n",
            "",
            "Total",
            "",
            format!("{} {}", total.format_with_symbol(""), currency),
            nw = name_width
        ));
    }

    output
}

/// Format account details for display
pub fn format_account_details(account: &Account, transaction_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account:      {}\n", account.name));
    output.push_str(&format!("ID:           {}\n", account.id));
    output.push_str(&format!("Type:         {}\n", account.account_type));
    output.push_str(&format!("Balance:      {}\n", balance(account)));
    output.push_str(&format!("Transactions: {}\n", transaction_count));
    output.push_str(&format!(
        "Updated:      {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
