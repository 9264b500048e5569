use std::process::ExitCode;

use clap::Args;
use donkey_engine::{Engine, InsertRequest};

use crate::commands::{CommandResult, ConnectOptions, PayloadOptions, finish, print_json};

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Target collection
    #[arg(long)]
    pub db: String,

    /// Key of the new item
    #[arg(long)]
    pub key: String,

    /// Opaque metadata stored with the item
    #[arg(long, default_value = "")]
    pub meta: String,

    #[command(flatten)]
    pub payload: PayloadOptions,

    #[command(flatten)]
    pub connect: ConnectOptions,
}

pub fn run(args: InsertArgs) -> ExitCode {
    finish(execute(&args))
}

fn execute(args: &InsertArgs) -> CommandResult<()> {
    let request = InsertRequest {
        db: args.db.clone(),
        key: args.key.clone(),
        meta: args.meta.clone(),
        raw: args.payload.raw()?,
        url: args.payload.url.clone(),
        content: args.payload.content.clone(),
        kind: args.payload.kind.clone(),
    };
    let client = args.connect.connect()?;
    let response = client.insert(&request)?;
    print_json(&response)
}
