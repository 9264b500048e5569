mod error;
mod memory;
mod translate;
mod types;

pub use error::{Error, ErrorCode, Result};
pub use memory::MemoryEngine;
pub use types::*;

/// The operations every search backend exposes, whether it runs in this
/// process or behind a socket.
///
/// Implementations are shared between server worker threads, so they take
/// `&self` and do their own synchronisation.
pub trait Engine: Send + Sync {
    fn ping(&self) -> Result<PingStats>;
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
    fn insert(&self, request: &InsertRequest) -> Result<InsertResponse>;
    fn misc(&self, request: &MiscRequest) -> Result<MiscResponse>;
}
