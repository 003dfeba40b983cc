use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{paint_tag, section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Table, TableColumn};
use crate::ledger::{BookingReceipt, ClientStay, StayRange};
use crate::utils::parse::{parse_amount, parse_day};

use super::{join_words, usage_error};

const BOOK_USAGE: &str = "book <start> <end> <client...> [--amount N] [--property P]";
const MOVE_USAGE: &str = "move <client> <property> <start> <end>";
const AMOUNT_USAGE: &str = "amount <client> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("book", "Book a stay for a client", BOOK_USAGE, cmd_book),
        CommandEntry::new(
            "move",
            "Move or resize a client's stay",
            MOVE_USAGE,
            cmd_move,
        ),
        CommandEntry::new(
            "delete",
            "Remove a client's bookings for the month",
            "delete <client>",
            cmd_delete,
        ),
        CommandEntry::new(
            "amount",
            "Set the amount a client paid this month",
            AMOUNT_USAGE,
            cmd_amount,
        ),
        CommandEntry::new(
            "clients",
            "List the month's clients across properties",
            "clients",
            cmd_clients,
        ),
    ]
}

struct BookArgs {
    start: u32,
    end: u32,
    client: String,
    amount: Option<f64>,
    property: Option<String>,
}

fn parse_book_args(args: &[&str]) -> Result<BookArgs, CommandError> {
    let mut positional = Vec::new();
    let mut amount = None;
    let mut property = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--amount" => {
                let value = iter.next().ok_or_else(|| usage_error(BOOK_USAGE))?;
                amount = Some(parse_amount(value));
            }
            "--property" => {
                let value = iter.next().ok_or_else(|| usage_error(BOOK_USAGE))?;
                property = Some(value.to_string());
            }
            other => positional.push(other),
        }
    }
    if positional.len() < 3 {
        return Err(usage_error(BOOK_USAGE));
    }
    Ok(BookArgs {
        start: parse_day(positional[0])?,
        end: parse_day(positional[1])?,
        client: join_words(&positional[2..]),
        amount,
        property,
    })
}

fn resolve_property(context: &ShellContext, name: Option<&str>) -> Result<String, CommandError> {
    match name {
        None => Ok(context.selection.property.clone()),
        Some(name) => context
            .config
            .find_property(name)
            .map(str::to_string)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown property `{name}`"))),
    }
}

fn print_receipt(verb: &str, receipt: &BookingReceipt) {
    io::print_success(format!(
        "{} {} in {}: days {} to {} ({} nights).",
        verb,
        receipt.client,
        receipt.property,
        receipt.start_day,
        receipt.end_day,
        receipt.nights()
    ));
}

fn cmd_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_book_args(args)?;
    let property = resolve_property(context, parsed.property.as_deref())?;
    let stay = StayRange::new(
        property,
        context.month_name(),
        context.selection.year,
        parsed.start,
        parsed.end,
    );
    let receipt = context
        .manager
        .create_booking(&stay, &parsed.client, parsed.amount)?;
    print_receipt("Booked", &receipt);
    Ok(())
}

fn cmd_move(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let &[client, property, start, end] = args else {
        return Err(usage_error(MOVE_USAGE));
    };
    let property = resolve_property(context, Some(property))?;
    let stay = StayRange::new(
        property,
        context.month_name(),
        context.selection.year,
        parse_day(start)?,
        parse_day(end)?,
    );
    let receipt = context.manager.move_booking(client, &stay)?;
    print_receipt("Moved", &receipt);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let client = join_words(args);
    if client.is_empty() {
        return Err(usage_error("delete <client>"));
    }
    let month = context.month_name();
    let year = context.selection.year;
    if !context.manager.group_by_client(month, year).contains_key(&client) {
        io::print_warning(format!("{} has no bookings in {} {}.", client, month, year));
        return Ok(());
    }
    if !context.confirm(&format!("Delete every booking of {client} in {month} {year}?"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let removed = context.manager.delete_client(month, year, &client);
    io::print_success(format!("Removed {} days booked by {}.", removed, client));
    Ok(())
}

fn cmd_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((value, client_words)) = args.split_last() else {
        return Err(usage_error(AMOUNT_USAGE));
    };
    let client = join_words(client_words);
    if client.is_empty() {
        return Err(usage_error(AMOUNT_USAGE));
    }
    let amount = parse_amount(value);
    let updated = context.manager.set_client_amount(
        &client,
        context.selection.month.name(),
        context.selection.year,
        amount,
    );
    if updated == 0 {
        io::print_warning(format!("{} has no bookings this month.", client));
    } else {
        io::print_success(format!(
            "{} paid {} ({} days updated).",
            client,
            context.config.format_amount(amount),
            updated
        ));
    }
    Ok(())
}

fn describe_days(stay: &ClientStay) -> String {
    if stay.is_contiguous() {
        format!("{}-{}", stay.first_day, stay.last_day)
    } else {
        stay.days
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn cmd_clients(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.month_name();
    let year = context.selection.year;
    let grouped = context.manager.group_by_client(month, year);
    section(format!("Clients {} {}", month, year));
    if grouped.is_empty() {
        io::print_info("No bookings this month.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Client"),
        TableColumn::left("Days"),
        TableColumn::right("Nights"),
        TableColumn::left("Properties"),
        TableColumn::right("Total"),
    ]);
    for (client, stay) in &grouped {
        table.add_row(vec![
            paint_tag(client, &stay.color),
            describe_days(stay),
            stay.days.len().to_string(),
            stay.properties.iter().cloned().collect::<Vec<_>>().join(", "),
            context.config.format_amount(stay.total),
        ]);
    }
    io::print_info(table.render());

    let totals = context.manager.client_totals(month, year);
    io::print_info(format!(
        "Clients: {} | Income: {}",
        totals.client_count,
        context.config.format_amount(totals.income)
    ));
    Ok(())
}
