use std::process::ExitCode;

use clap::Args;
use donkey_engine::{Engine, SearchRequest, UNSET_K, UNSET_R};

use crate::commands::{CommandResult, ConnectOptions, PayloadOptions, finish, print_json};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Collection to search
    #[arg(long)]
    pub db: String,

    #[command(flatten)]
    pub payload: PayloadOptions,

    /// Maximum number of hits
    #[arg(short = 'k', long = "limit")]
    pub k: Option<i32>,

    /// Score radius
    #[arg(short = 'r', long = "radius")]
    pub r: Option<f64>,

    /// Candidate count hint passed to the engine
    #[arg(long)]
    pub hint_k: Option<i32>,

    /// Radius hint passed to the engine
    #[arg(long)]
    pub hint_r: Option<f64>,

    #[command(flatten)]
    pub connect: ConnectOptions,
}

impl SearchArgs {
    fn request(&self) -> CommandResult<SearchRequest> {
        Ok(SearchRequest {
            db: self.db.clone(),
            raw: self.payload.raw()?,
            url: self.payload.url.clone(),
            content: self.payload.content.clone(),
            kind: self.payload.kind.clone(),
            k: self.k.unwrap_or(UNSET_K),
            r: self.r.unwrap_or(UNSET_R),
            hint_k: self.hint_k.unwrap_or(UNSET_K),
            hint_r: self.hint_r.unwrap_or(UNSET_R),
        })
    }
}

pub fn run(args: SearchArgs) -> ExitCode {
    finish(execute(&args))
}

fn execute(args: &SearchArgs) -> CommandResult<()> {
    let request = args.request()?;
    let client = args.connect.connect()?;
    let response = client.search(&request)?;
    print_json(&response)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
