//! Remote access to a donkey [`Engine`](donkey_engine::Engine).
//!
//! [`Server`] exposes a local engine on a TCP port, [`Client`] talks to such
//! a server and is itself an `Engine`, so callers can swap one for the other.

mod address;
mod client;
mod facade;
mod lifecycle;
mod server;

pub use address::NetworkAddress;
pub use client::Client;
pub use facade::Facade;
pub use lifecycle::{Lifecycle, StartRecord};
pub use server::{RunningServer, Server, Termination, TerminationSource};

#[cfg(test)]
mod test_support;
