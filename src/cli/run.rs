use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, build::build, init::init},
};

/// Dispatch to the command handler.
///
/// # Returns
/// - `Ok(CommandResult)` with issues and error/warning counts
/// - `Err` if the command itself fails (invalid config, unreadable source root)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Build(cmd)) => build(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
