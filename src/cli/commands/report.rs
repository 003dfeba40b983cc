use crate::cli::core::CommandResult;
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Per-property income and the month balance",
        "summary",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.month_name();
    let year = context.selection.year;
    let fmt = |amount: f64| context.config.format_amount(amount);

    section(format!("Summary {} {}", month, year));
    let mut table = Table::new(vec![
        TableColumn::left("Property"),
        TableColumn::right("Days"),
        TableColumn::right("Income"),
    ]);
    for summary in context.manager.property_summary(month, year) {
        table.add_row(vec![
            summary.property,
            summary.occupied_days.to_string(),
            fmt(summary.income),
        ]);
    }
    io::print_info(table.render());

    let balance = context.manager.month_balance(month, year);
    io::print_info(format!("Income   : {}", fmt(balance.income)));
    io::print_info(format!("Expenses : {}", fmt(balance.expenses)));
    if balance.balance < 0.0 {
        io::print_warning(format!("Balance  : {}", fmt(balance.balance)));
    } else {
        io::print_success(format!("Balance  : {}", fmt(balance.balance)));
    }
    Ok(())
}
