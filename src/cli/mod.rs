//! Line-oriented shell over the booking manager.

mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, Selection, ShellContext};
