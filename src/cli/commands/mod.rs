mod booking;
mod calendar;
mod expense;
mod report;
mod selection;
mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in selection::definitions()
        .into_iter()
        .chain(booking::definitions())
        .chain(calendar::definitions())
        .chain(expense::definitions())
        .chain(report::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
    registry
}

fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

/// Remaining words joined back into one name, e.g. an unquoted client name.
fn join_words(args: &[&str]) -> String {
    args.join(" ").trim().to_string()
}
