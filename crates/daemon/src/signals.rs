use anyhow::{Context, Result};
use donkey_rpc::{Termination, TerminationSource};
use log::info;
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

pub const HANDLED_SIGNALS: [i32; 4] = [SIGHUP, SIGINT, SIGTERM, SIGQUIT];

/// Hang-up restarts, everything else stops.
pub fn termination_for(signal: i32) -> Termination {
    if signal == SIGHUP {
        Termination::Restart
    } else {
        Termination::Shutdown
    }
}

/// Blocks the calling thread until one of [`HANDLED_SIGNALS`] arrives.
///
/// Registered once per process and reused across server generations, so a
/// signal delivered between generations is not lost.
pub struct SignalWaiter {
    signals: Signals,
}

impl SignalWaiter {
    pub fn new() -> Result<Self> {
        let signals = Signals::new(HANDLED_SIGNALS).context("Failed to register signal handlers")?;
        Ok(Self { signals })
    }
}

impl TerminationSource for SignalWaiter {
    fn wait(&mut self) -> Termination {
        match self.signals.forever().next() {
            Some(signal) => {
                info!("Received signal {signal}");
                termination_for(signal)
            }
            None => Termination::Shutdown,
        }
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
