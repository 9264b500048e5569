use std::process::ExitCode;

use clap::Args;
use donkey_engine::Engine;

use crate::commands::{CommandResult, ConnectOptions, finish, print_json};

#[derive(Debug, Args)]
pub struct PingArgs {
    #[command(flatten)]
    pub connect: ConnectOptions,
}

pub fn run(args: PingArgs) -> ExitCode {
    finish(execute(&args))
}

fn execute(args: &PingArgs) -> CommandResult<()> {
    let client = args.connect.connect()?;
    let stats = client.ping()?;
    print_json(&stats)
}
