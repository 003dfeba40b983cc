use crate::calendar::{build_calendar_grid, month_info, WEEKDAY_INITIALS};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{paint_tag, section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::ledger::DayLedger;

use super::join_words;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "calendar",
            "Show the month grid for a property",
            "calendar [property]",
            cmd_calendar,
        ),
        CommandEntry::new(
            "overview",
            "Occupancy of every property this month",
            "overview",
            cmd_overview,
        ),
    ]
}

/// Seven columns, Sunday first. Booked days carry the client's color and a `*`.
fn render_grid(month: &str, year: i32, days: &DayLedger) -> Vec<String> {
    let header = WEEKDAY_INITIALS
        .iter()
        .map(|initial| format!("{initial:>4}"))
        .collect::<String>();
    let mut lines = vec![header];
    for week in build_calendar_grid(month, year).chunks(7) {
        let line = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(day) => match days.get(*day).filter(|b| b.is_occupied()) {
                    Some(booking) => format!(" {}", paint_tag(&format!("{day:>2}*"), &booking.color)),
                    None => format!("{day:>4}"),
                },
            })
            .collect::<String>();
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn cmd_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let property = if args.is_empty() {
        context.selection.property.clone()
    } else {
        let name = join_words(args);
        context
            .config
            .find_property(&name)
            .map(str::to_string)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown property `{name}`")))?
    };
    let month = context.month_name();
    let year = context.selection.year;
    let info = month_info(month, year);
    let days = context.manager.day_ledger(&property, month, year);

    section(format!("{} | {}", property, info.display_name));
    for line in render_grid(month, year, days) {
        io::print_info(line);
    }

    let legend = days.clients();
    if legend.is_empty() {
        io::print_info("No bookings.");
    }
    for (client, color) in legend {
        let booked: Vec<u32> = days.days_of(client).collect();
        let first = booked.first().copied().unwrap_or_default();
        let last = booked.last().copied().unwrap_or_default();
        io::print_info(format!(
            "  {} days {}-{} ({} nights)",
            paint_tag(client, color),
            first,
            last,
            booked.len()
        ));
    }
    Ok(())
}

fn cmd_overview(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.month_name();
    let year = context.selection.year;
    let stats = context.manager.occupancy(month, year);
    let rows = context.manager.month_overview(month, year);
    let width = context
        .config
        .properties
        .iter()
        .map(|p| p.chars().count())
        .max()
        .unwrap_or(0);

    section(format!("Occupancy {} {}", month, year));
    for stat in &stats {
        io::print_info(format!(
            "{:<width$}  {:>2}/{} days  {:.1}%",
            stat.property, stat.occupied_days, stat.days_in_month, stat.percentage
        ));
    }

    let ruler: String = (1..=rows.first().map_or(0, |row| row.days.len()))
        .map(|day| char::from_digit((day % 10) as u32, 10).unwrap_or(' '))
        .collect();
    io::print_info(format!("{:<width$}  {}", "", ruler));
    for row in &rows {
        let cells: String = row
            .days
            .iter()
            .map(|cell| match cell {
                Some(cell) => {
                    let initial = cell.client.chars().next().unwrap_or('#').to_uppercase().to_string();
                    paint_tag(&initial, &cell.color)
                }
                None => ".".to_string(),
            })
            .collect();
        io::print_info(format!("{:<width$}  {}", row.property, cells));
    }
    Ok(())
}
