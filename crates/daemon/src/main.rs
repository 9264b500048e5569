use std::sync::Arc;

mod config;
mod driver;
mod signals;

use clap::Parser;
use config::{Cli, DaemonConfig};
use donkey_engine::MemoryEngine;
use donkey_rpc::Lifecycle;
use donkey_runtime::logging;
use log::info;
use signals::SignalWaiter;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = DaemonConfig::from_args(&args)?;
    logging::init_with_fallback(config.log_level.as_deref()).ok();

    let engine = Arc::new(MemoryEngine::new());
    let lifecycle = Arc::new(Lifecycle::new());
    let mut signals = SignalWaiter::new()?;

    driver::drive(engine, lifecycle, config, &mut signals, || {
        DaemonConfig::from_args(&args)
    })?;

    info!("Server shutdown complete.");
    Ok(())
}
