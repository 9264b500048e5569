use std::process::ExitCode;

use clap::Args;
use donkey_engine::{Engine, MiscRequest};

use crate::commands::{CommandResult, ConnectOptions, finish, print_json};

#[derive(Debug, Args)]
pub struct MiscArgs {
    /// Engine command, e.g. `count` or `clear`
    pub method: String,

    /// Collection the command applies to
    #[arg(long, default_value = "")]
    pub db: String,

    #[command(flatten)]
    pub connect: ConnectOptions,
}

pub fn run(args: MiscArgs) -> ExitCode {
    finish(execute(&args))
}

fn execute(args: &MiscArgs) -> CommandResult<()> {
    let client = args.connect.connect()?;
    let response = client.misc(&MiscRequest {
        method: args.method.clone(),
        db: args.db.clone(),
    })?;
    print_json(&response)
}
