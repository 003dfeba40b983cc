use crate::calendar::{month_info, Month};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::{join_words, usage_error};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("month", "Select the working month", "month <name>", cmd_month),
        CommandEntry::new("year", "Select the working year", "year <yyyy>", cmd_year),
        CommandEntry::new(
            "property",
            "Select the working property",
            "property <name>",
            cmd_property,
        ),
        CommandEntry::new("status", "Show the current selection", "status", cmd_status),
    ]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.first().ok_or_else(|| usage_error("month <name>"))?;
    let month = Month::parse(name).ok_or_else(|| {
        let names: Vec<&str> = Month::all().map(Month::name).collect();
        CommandError::InvalidArguments(format!(
            "unknown month `{}`; expected one of {}",
            name,
            names.join(", ")
        ))
    })?;
    context.selection.month = month;
    io::print_success(format!("Month set to {} {}.", month, context.selection.year));
    Ok(())
}

fn cmd_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("year <yyyy>"))?;
    let year: i32 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a year")))?;
    let allowed = context.selectable_years();
    if !allowed.contains(&year) {
        return Err(CommandError::InvalidArguments(format!(
            "year must be between {} and {}",
            allowed.start(),
            allowed.end()
        )));
    }
    context.selection.year = year;
    io::print_success(format!("Year set to {}.", year));
    Ok(())
}

fn cmd_property(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = join_words(args);
    if name.is_empty() {
        return Err(usage_error("property <name>"));
    }
    let property = context
        .config
        .find_property(&name)
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown property `{}`; expected one of {}",
                name,
                context.config.properties.join(", ")
            ))
        })?;
    io::print_success(format!("Property set to {}.", property));
    context.selection.property = property;
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let info = month_info(context.month_name(), context.selection.year);
    io::print_info(format!("Month    : {}", info.display_name));
    io::print_info(format!(
        "Days     : {}{}",
        info.days_in_month,
        if info.is_leap_year { " (leap year)" } else { "" }
    ));
    io::print_info(format!("Property : {}", context.selection.property));
    io::print_info(format!("Data dir : {}", context.store.base_dir().display()));
    io::print_info(format!("Config   : {}", context.config_manager.path().display()));
    Ok(())
}
