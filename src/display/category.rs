//! Category display formatting

use crate::models::Category;
use crate::planning::{classify_category, CategoryClassification};

/// Format categories as a table with their role
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'planner init' to create default categories."
            .to_string();
    }

    let label_width = categories
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let value_width = categories
        .iter()
        .map(|c| c.value.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<lw$}  {:<vw$}  {:<8}  {}\n",
        "Label",
        "Value",
        "Role",
        "Icon",
        lw = label_width,
        vw = value_width
    ));
    output.push_str(&format!(
        "{:-<lw$}  {:-<vw$}  {:-<8}  {:-<8}\n",
        "",
        "",
        "",
        "",
        lw = label_width,
        vw = value_width
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<lw$}  {:<vw$}  {:<8}  {}\n",
            category.label,
            category.value,
            classify_category(category),
            category.icon,
            lw = label_width,
            vw = value_width
        ));
    }

    output
}

/// Format the income / savings / expense split
pub fn format_classification(classification: &CategoryClassification) -> String {
    let mut output = String::new();

    for (title, list) in [
        ("Income", &classification.income),
        ("Savings", &classification.savings),
        ("Expense", &classification.expense),
    ] {
        output.push_str(&format!("{} ({})\n", title, list.len()));
        if list.is_empty() {
            output.push_str("  (none)\n");
        }
        for (i, category) in list.iter().enumerate() {
            let prefix = if i + 1 == list.len() { "└── " } else { "├── " };
            output.push_str(&format!("  {}{} [{}]\n", prefix, category.label, category.value));
        }
    }

    output
}

/// Format category details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.label));
    output.push_str(&format!("  Value: {}\n", category.value));
    output.push_str(&format!("  Role:  {}\n", classify_category(category)));
    output.push_str(&format!("  Icon:  {}\n", category.icon));
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
