pub mod insert;
pub mod misc;
pub mod ping;
pub mod search;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Subcommand};
use donkey_rpc::Client;
use donkey_runtime::Settings;
use serde::Serialize;

pub use insert::InsertArgs;
pub use misc::MiscArgs;
pub use ping::PingArgs;
pub use search::SearchArgs;

/// Common error type for command handlers
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show server start time and restart count.
    Ping(PingArgs),

    /// Search a collection.
    ///
    /// Example:
    ///   donkey search --db images --url http://host/a.jpg -k 10
    Search(SearchArgs),

    /// Insert an item into a collection.
    ///
    /// Example:
    ///   donkey insert --db images --key a --raw-file a.jpg
    Insert(InsertArgs),

    /// Run an engine-specific administrative command.
    ///
    /// Example:
    ///   donkey misc count --db images
    Misc(MiscArgs),
}

#[derive(Debug, Args)]
pub struct ConnectOptions {
    /// Server address as host[:port] (defaults to the settings file)
    #[arg(long, short = 's')]
    pub server: Option<String>,
}

impl ConnectOptions {
    pub fn connect(&self) -> CommandResult<Client> {
        let client = match &self.server {
            Some(addr) => Client::connect(addr)?,
            None => Client::from_settings(&Settings::load()?.client)?,
        };
        Ok(client)
    }
}

/// Query payload shared by search and insert.
#[derive(Debug, Args)]
pub struct PayloadOptions {
    /// Read the raw payload from this file
    #[arg(long, value_name = "PATH")]
    pub raw_file: Option<PathBuf>,

    /// Payload URL
    #[arg(long, default_value = "")]
    pub url: String,

    /// Inline payload content
    #[arg(long, default_value = "")]
    pub content: String,

    /// Payload content type
    #[arg(long = "type", default_value = "")]
    pub kind: String,
}

impl PayloadOptions {
    pub fn raw(&self) -> CommandResult<Vec<u8>> {
        match &self.raw_file {
            Some(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(bytes)
            }
            None => Ok(Vec::new()),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CommandResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn finish(result: CommandResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}
