use std::process::ExitCode;

use clap::Parser;

mod commands;

use commands::Command;
use donkey_runtime::{Settings, logging};

#[derive(Debug, Parser)]
#[command(name = "donkey", version, about = "Donkey search client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// `log_level` from the settings file. A file that fails to load gives
/// none here; commands that need the settings report the error themselves.
fn settings_log_level() -> Option<String> {
    Settings::load().ok().and_then(|settings| settings.log_level)
}

fn main() -> ExitCode {
    logging::init_with_fallback(settings_log_level().as_deref()).ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Ping(args) => commands::ping::run(args),
        Command::Search(args) => commands::search::run(args),
        Command::Insert(args) => commands::insert::run(args),
        Command::Misc(args) => commands::misc::run(args),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
