use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use std::sync::Mutex;

use donkey_engine::{
    Engine, Error, ErrorCode, InsertRequest, InsertResponse, MiscRequest, MiscResponse,
    PingStats, Result, SearchRequest, SearchResponse,
};
use donkey_protocol::codec::{read_message, write_message};
use donkey_protocol::{RpcRequest, RpcResponse};
use donkey_runtime::ClientSettings;
use log::debug;

use crate::address::NetworkAddress;

struct Connection {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    /// Set once a round trip fails; the stream may sit mid-frame after that.
    broken: bool,
}

impl Connection {
    fn open(address: &NetworkAddress) -> Result<Self> {
        let stream = TcpStream::connect((address.host(), address.port())).map_err(|e| {
            Error::new(ErrorCode::Io, format!("failed to connect to {address}: {e}"))
        })?;
        if let Err(err) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {err}");
        }
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            reader,
            writer: BufWriter::new(stream),
            broken: false,
        })
    }

    fn round_trip(&mut self, request: &RpcRequest) -> anyhow::Result<RpcResponse> {
        write_message(&mut self.writer, request)?;
        read_message(&mut self.reader)
    }

    fn close(&self) {
        if let Err(err) = self.writer.get_ref().shutdown(Shutdown::Both) {
            debug!("Failed to close connection: {err}");
        }
    }
}

/// Remote [`Engine`] reached over one TCP connection.
///
/// The connection is opened on construction and closed on drop. Calls are
/// serialized on it, one request in flight at a time; use one client per
/// thread for parallelism.
pub struct Client {
    address: NetworkAddress,
    conn: Mutex<Connection>,
}

impl Client {
    /// `address` is `host[:port]`; missing parts take the defaults.
    pub fn connect(address: &str) -> Result<Self> {
        Self::open(address.parse()?)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::connect(&settings.server)
    }

    pub fn open(address: NetworkAddress) -> Result<Self> {
        let conn = Connection::open(&address)?;
        debug!("Connected to {address}");
        Ok(Self {
            address,
            conn: Mutex::new(conn),
        })
    }

    pub fn address(&self) -> &NetworkAddress {
        &self.address
    }

    /// One remote call. A failure record from the server comes back with its
    /// own code; anything going wrong in transit is `Unknown`.
    fn call(&self, request: RpcRequest) -> Result<RpcResponse> {
        let method = request.method();
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| Error::unknown("connection lock poisoned"))?;

        if conn.broken {
            return Err(Error::unknown(format!(
                "{method} call to {} refused: connection broken by an earlier failure",
                self.address
            )));
        }

        let reply = conn.round_trip(&request).map_err(|e| {
            conn.broken = true;
            Error::unknown(format!("{method} call to {} failed: {e:#}", self.address))
        })?;

        match reply {
            RpcResponse::Failure(err) => Err(err.into()),
            other => Ok(other),
        }
    }
}

fn unexpected(method: &str, reply: &RpcResponse) -> Error {
    Error::unknown(format!("unexpected reply to {method}: {reply:?}"))
}

impl Engine for Client {
    fn ping(&self) -> Result<PingStats> {
        match self.call(RpcRequest::Ping(Default::default()))? {
            RpcResponse::Ping(resp) => Ok(resp.into()),
            other => Err(unexpected("ping", &other)),
        }
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        match self.call(RpcRequest::Search(request.clone().into()))? {
            RpcResponse::Search(resp) => Ok(resp.into()),
            other => Err(unexpected("search", &other)),
        }
    }

    fn insert(&self, request: &InsertRequest) -> Result<InsertResponse> {
        match self.call(RpcRequest::Insert(request.clone().into()))? {
            RpcResponse::Insert(resp) => Ok(resp.into()),
            other => Err(unexpected("insert", &other)),
        }
    }

    fn misc(&self, request: &MiscRequest) -> Result<MiscResponse> {
        match self.call(RpcRequest::Misc(request.clone().into()))? {
            RpcResponse::Misc(resp) => Ok(resp.into()),
            other => Err(unexpected("misc", &other)),
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        let conn = self.conn.get_mut().unwrap_or_else(|e| e.into_inner());
        conn.close();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
