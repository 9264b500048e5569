use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use donkey_engine::{Engine, ErrorCode, InsertRequest, MiscRequest, Result, SearchRequest};
use donkey_protocol as wire;
use donkey_protocol::{RpcRequest, RpcResponse, WireError};
use log::{error, warn};

use crate::lifecycle::{Lifecycle, StartRecord};

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

/// Run one handler body and turn whatever goes wrong into the wire failure
/// record. Engine errors keep their code and message, a panic becomes
/// `Unknown`.
fn protect<T, F>(method: &str, body: F) -> std::result::Result<T, WireError>
where
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!("{method} failed: {err}");
            Err(err.into())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(
                "{method} panicked: {}",
                message.as_deref().unwrap_or("<no message>")
            );
            Err(WireError {
                code: ErrorCode::Unknown.as_i32(),
                message,
            })
        }
    }
}

/// The four remote operations, backed by a local engine.
///
/// Holds nothing mutable of its own, so one instance is shared by every
/// worker thread.
pub struct Facade<E> {
    engine: Arc<E>,
    lifecycle: Arc<Lifecycle>,
    start: StartRecord,
}

impl<E: Engine> Facade<E> {
    pub fn new(engine: Arc<E>, lifecycle: Arc<Lifecycle>, start: StartRecord) -> Self {
        Self {
            engine,
            lifecycle,
            start,
        }
    }

    pub fn ping(&self) -> wire::PingResponse {
        let stats = self.lifecycle.snapshot();
        wire::PingResponse {
            first_start_time: stats.first_start_time,
            last_start_time: self.start.started_at,
            restart_count: stats.restart_count,
        }
    }

    pub fn search(
        &self,
        request: wire::SearchRequest,
    ) -> std::result::Result<wire::SearchResponse, WireError> {
        protect("search", || {
            let req = SearchRequest::from(request);
            self.engine.search(&req).map(Into::into)
        })
    }

    pub fn insert(
        &self,
        request: wire::InsertRequest,
    ) -> std::result::Result<wire::InsertResponse, WireError> {
        protect("insert", || {
            let req = InsertRequest::from(request);
            self.engine.insert(&req).map(Into::into)
        })
    }

    pub fn misc(
        &self,
        request: wire::MiscRequest,
    ) -> std::result::Result<wire::MiscResponse, WireError> {
        protect("misc", || {
            let req = MiscRequest::from(request);
            self.engine.misc(&req).map(Into::into)
        })
    }

    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let reply = match request {
            RpcRequest::Ping(_) => Ok(RpcResponse::Ping(self.ping())),
            RpcRequest::Search(req) => self.search(req).map(RpcResponse::Search),
            RpcRequest::Insert(req) => self.insert(req).map(RpcResponse::Insert),
            RpcRequest::Misc(req) => self.misc(req).map(RpcResponse::Misc),
        };
        reply.unwrap_or_else(RpcResponse::Failure)
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
