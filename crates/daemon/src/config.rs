use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use donkey_runtime::{ServerSettings, Settings};

#[derive(Debug, Parser)]
#[command(name = "donkey-daemon", version, about = "Donkey search server")]
pub struct Cli {
    /// Settings file (defaults to $DONKEY_CONFIG or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Number of worker threads
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Interface to bind
    #[arg(long)]
    pub bind: Option<String>,
}

/// Effective daemon configuration: the settings file with the command line
/// applied on top.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub server: ServerSettings,
    pub log_level: Option<String>,
}

impl DaemonConfig {
    pub fn from_args(args: &Cli) -> Result<Self> {
        let settings = match &args.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        let mut server = settings.server;
        if let Some(port) = args.port {
            server.port = port;
        }
        if let Some(threads) = args.threads {
            server.threads = threads;
        }
        if let Some(bind) = &args.bind {
            server.bind = bind.clone();
        }

        Ok(Self {
            server,
            log_level: settings.log_level,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
