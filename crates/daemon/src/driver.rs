use std::sync::Arc;

use anyhow::Result;
use donkey_engine::Engine;
use donkey_rpc::{Lifecycle, Server, Termination, TerminationSource};
use log::{error, info};

use crate::config::DaemonConfig;

/// Run server generations until `source` asks for a shutdown.
///
/// After every restart `reload` is asked for fresh configuration; if that
/// fails the previous configuration is kept so a hang-up never ends the
/// process. Returns the configuration the last generation ran with.
pub fn drive<E, S, L>(
    engine: Arc<E>,
    lifecycle: Arc<Lifecycle>,
    mut config: DaemonConfig,
    source: &mut S,
    mut reload: L,
) -> Result<DaemonConfig>
where
    E: Engine + 'static,
    S: TerminationSource,
    L: FnMut() -> Result<DaemonConfig>,
{
    loop {
        info!(
            "Starting donkey server: bind={}, port={}, threads={}",
            config.server.bind, config.server.port, config.server.threads
        );

        let server = Server::new(
            Arc::clone(&engine),
            config.server.clone(),
            Arc::clone(&lifecycle),
        );

        match server.run(source)? {
            Termination::Restart => {
                info!("Restarting the server...");
                match reload() {
                    Ok(fresh) => config = fresh,
                    Err(err) => {
                        error!("Failed to reload configuration, keeping the previous one: {err:#}")
                    }
                }
            }
            Termination::Shutdown => return Ok(config),
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
