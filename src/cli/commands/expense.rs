use crate::cli::core::CommandResult;
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};
use crate::ledger::ExpenseCategory;
use crate::utils::parse::parse_amount;

use super::usage_error;

const EXPENSE_USAGE: &str = "expense <category> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "expense",
            "Set one expense for the month",
            EXPENSE_USAGE,
            cmd_expense,
        ),
        CommandEntry::new("expenses", "List the month's expenses", "expenses", cmd_expenses),
    ]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let &[category, value] = args else {
        return Err(usage_error(EXPENSE_USAGE));
    };
    let amount = parse_amount(value);
    let stored_name = match ExpenseCategory::parse(category) {
        Some(known) => known.storage_name().to_string(),
        None => {
            io::print_warning(format!(
                "`{}` is not a standard category; it is stored but left out of totals.",
                category
            ));
            category.to_string()
        }
    };
    context.manager.set_expense(
        context.selection.month.name(),
        context.selection.year,
        &stored_name,
        amount,
    )?;
    let label = ExpenseCategory::parse(&stored_name)
        .map(|c| c.label().to_string())
        .unwrap_or(stored_name);
    io::print_success(format!(
        "{} set to {}.",
        label,
        context.config.format_amount(amount)
    ));
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.month_name();
    let year = context.selection.year;
    let expenses = context.manager.expenses(month, year);

    section(format!("Expenses {} {}", month, year));
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::left("Key"),
        TableColumn::right("Amount"),
    ]);
    for (category, amount) in expenses.iter() {
        table.add_row(vec![
            category.label().to_string(),
            category.storage_name().to_string(),
            context.config.format_amount(amount),
        ]);
    }
    io::print_info(table.render());
    io::print_info(format!(
        "Total expenses: {}",
        context.config.format_amount(expenses.total())
    ));
    Ok(())
}
