use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::storage::json_backend::backup_timestamp;
use crate::storage::{EXPENSES_KEY, RESERVATIONS_KEY};
use crate::utils::build_info;

const RESTORE_USAGE: &str = "restore <n> [expenses]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backups",
            "List stored backups of the bookings (or expenses)",
            "backups [expenses]",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Restore a backup by its number from `backups`",
            RESTORE_USAGE,
            cmd_restore,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn target_key(arg: Option<&&str>) -> Result<&'static str, CommandError> {
    match arg.map(|value| value.to_lowercase()) {
        None => Ok(RESERVATIONS_KEY),
        Some(value) if value == "expenses" => Ok(EXPENSES_KEY),
        Some(value) if value == "bookings" => Ok(RESERVATIONS_KEY),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown backup set `{other}`; use `bookings` or `expenses`"
        ))),
    }
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = target_key(args.first())?;
    let backups = context.store.list_backups(key)?;
    output_section(format!("Backups of {}", key));
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    for (idx, name) in backups.iter().enumerate() {
        let when = backup_timestamp(name)
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        io::print_info(format!("  {:>2}. {}  {}", idx + 1, when, name));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {RESTORE_USAGE}")))?;
    let key = target_key(args.get(1))?;
    let backups = context.store.list_backups(key)?;
    let name = raw
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| backups.get(idx))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{}` is not a backup number (1-{})",
                raw,
                backups.len()
            ))
        })?;
    if !context.confirm(&format!("Replace current {key} with {name}?"))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    context.store.restore_backup(key, name)?;
    context.manager.reload();
    io::print_success(format!("Restored {} from {}.", key, name));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Booking Core {}", meta.version));
    io::print_info(format!("  {}", meta.summary()));
    io::print_info(format!("  Built at : {}", meta.timestamp));
    io::print_info(format!("  Rustc    : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
