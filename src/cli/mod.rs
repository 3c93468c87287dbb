pub mod commands;
pub mod output;
mod shell;

pub use commands::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
