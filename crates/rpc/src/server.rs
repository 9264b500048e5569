use std::collections::HashMap;
use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, anyhow};
use crossbeam::channel::{self, Receiver, Sender};
use donkey_engine::Engine;
use donkey_protocol::RpcRequest;
use donkey_protocol::codec::{try_read_message, write_message};
use donkey_runtime::ServerSettings;
use log::{debug, error, info, warn};

use crate::facade::Facade;
use crate::lifecycle::{Lifecycle, StartRecord};

/// How long the accept thread sleeps when no connection is pending before
/// checking the shutdown flag again.
const ACCEPT_POLL: Duration = Duration::from_millis(20);

/// Why a running server was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Build a new server generation and keep going.
    Restart,
    /// Leave the process.
    Shutdown,
}

/// Something the caller can block on until the server should stop.
pub trait TerminationSource {
    fn wait(&mut self) -> Termination;
}

/// A dropped sender means nobody can ask for a restart any more.
impl TerminationSource for Receiver<Termination> {
    fn wait(&mut self) -> Termination {
        self.recv().unwrap_or(Termination::Shutdown)
    }
}

/// Connections currently owned by a worker, kept so that stopping the
/// server can hang up on idle clients.
#[derive(Default)]
struct Connections {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, TcpStream>>,
}

struct Shared {
    shutdown: AtomicBool,
    connections: Connections,
}

impl Shared {
    /// Register `stream` unless the server is already stopping.
    fn admit(&self, stream: &TcpStream) -> io::Result<Option<u64>> {
        let handle = stream.try_clone()?;
        let mut live = self
            .connections
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let id = self.connections.next_id.fetch_add(1, Ordering::Relaxed);
        live.insert(id, handle);
        Ok(Some(id))
    }

    fn release(&self, id: u64) {
        self.connections
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    fn hang_up_all(&self) {
        let live = self
            .connections
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for stream in live.values() {
            if let Err(err) = stream.shutdown(Shutdown::Both) {
                debug!("Failed to shut down connection: {err}");
            }
        }
        if !live.is_empty() {
            info!("Closed {} open connection(s).", live.len());
        }
    }
}

/// One server generation, constructed but not yet listening.
pub struct Server<E> {
    facade: Arc<Facade<E>>,
    settings: ServerSettings,
    start: StartRecord,
}

impl<E: Engine + 'static> Server<E> {
    /// Construction counts as a start in `lifecycle`.
    pub fn new(engine: Arc<E>, settings: ServerSettings, lifecycle: Arc<Lifecycle>) -> Self {
        let start = lifecycle.record_start();
        let facade = Arc::new(Facade::new(engine, lifecycle, start));
        Self {
            facade,
            settings,
            start,
        }
    }

    pub fn start_record(&self) -> StartRecord {
        self.start
    }

    /// Bind the listener and start serving in the background.
    pub fn start(self) -> anyhow::Result<RunningServer> {
        let bind = (self.settings.bind.as_str(), self.settings.port);
        let listener = TcpListener::bind(bind)
            .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?;
        listener
            .set_nonblocking(true)
            .context("Failed to make listener non-blocking")?;
        let local_addr = listener.local_addr()?;

        let threads = self.settings.threads.max(1);
        let shared = Arc::new(Shared {
            shutdown: AtomicBool::new(false),
            connections: Connections::default(),
        });

        info!(
            "Starting the server on {local_addr} with {threads} worker(s), generation {}",
            self.start.generation
        );

        let accept = {
            let shared = Arc::clone(&shared);
            let facade = self.facade;
            thread::Builder::new()
                .name("donkey-accept".into())
                .spawn(move || serve(listener, &*facade, &*shared, threads))
                .context("Failed to spawn accept thread")?
        };

        Ok(RunningServer {
            local_addr,
            shared,
            accept: Some(accept),
        })
    }

    /// Serve until `source` says to stop, then stop and report why.
    pub fn run(self, source: &mut impl TerminationSource) -> anyhow::Result<Termination> {
        self.start()?.wait(source)
    }
}

/// A listening server. Stopping (explicitly or by drop) joins every thread
/// it started.
pub struct RunningServer {
    local_addr: SocketAddr,
    shared: Arc<Shared>,
    accept: Option<JoinHandle<()>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn wait(self, source: &mut impl TerminationSource) -> anyhow::Result<Termination> {
        let reason = source.wait();
        info!("Received {reason:?}; stopping the server...");
        self.stop()?;
        Ok(reason)
    }

    pub fn stop(mut self) -> anyhow::Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        let Some(accept) = self.accept.take() else {
            return Ok(());
        };

        self.shared.shutdown.store(true, Ordering::SeqCst);
        accept
            .join()
            .map_err(|_| anyhow!("accept thread panicked"))?;

        info!("Server on {} stopped.", self.local_addr);
        Ok(())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("Failed to stop server on {}: {err:#}", self.local_addr);
        }
    }
}

/// Body of the accept thread: owns the worker pool and returns only once
/// every worker has exited.
fn serve<E: Engine>(listener: TcpListener, facade: &Facade<E>, shared: &Shared, threads: usize) {
    thread::scope(|s| {
        // Unbounded, as in a thread-pool server: connections queue while all workers are busy.
        let (conn_tx, conn_rx) = channel::unbounded::<TcpStream>();

        for worker_id in 0..threads {
            let conn_rx = conn_rx.clone();
            let spawned = thread::Builder::new()
                .name(format!("donkey-worker-{worker_id}"))
                .spawn_scoped(s, move || worker_loop(conn_rx, facade, shared));
            if let Err(err) = spawned {
                error!("Failed to spawn worker {worker_id}: {err}");
            }
        }
        drop(conn_rx);

        accept_loop(&listener, &conn_tx, shared);

        // Workers drain what is queued (and drop it, since we are stopping)
        // and exit once the channel is closed.
        drop(conn_tx);
        shared.hang_up_all();
    });
}

fn accept_loop(listener: &TcpListener, conn_tx: &Sender<TcpStream>, shared: &Shared) {
    loop {
        if shared.shutdown.load(Ordering::SeqCst) {
            info!("Shutdown requested; no longer accepting connections.");
            break;
        }

        match listener.accept() {
            Ok((stream, addr)) => {
                debug!("Accepted connection from {addr}");
                if let Err(err) = stream.set_nonblocking(false) {
                    warn!("Dropping connection from {addr}: {err}");
                    continue;
                }
                if conn_tx.send(stream).is_err() {
                    error!("No workers left to serve connections.");
                    break;
                }
            }
            Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
            }
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                error!("Accept error: {err}");
                thread::sleep(ACCEPT_POLL);
            }
        }
    }
}

fn worker_loop<E: Engine>(conn_rx: Receiver<TcpStream>, facade: &Facade<E>, shared: &Shared) {
    for stream in conn_rx.iter() {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "<unknown peer>".to_string());

        let id = match shared.admit(&stream) {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!("Dropping queued connection from {peer}; server is stopping.");
                continue;
            }
            Err(err) => {
                warn!("Cannot track connection from {peer}: {err}");
                continue;
            }
        };

        debug!("Serving {peer}");
        match handle_connection(stream, facade) {
            Ok(()) => debug!("{peer} disconnected"),
            Err(err) => debug!("Connection with {peer} ended: {err:#}"),
        }
        shared.release(id);
    }
}

/// Answer requests on one connection until the peer hangs up.
fn handle_connection<E: Engine>(stream: TcpStream, facade: &Facade<E>) -> anyhow::Result<()> {
    if let Err(err) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {err}");
    }
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    while let Some(request) =
        try_read_message::<_, RpcRequest>(&mut reader).context("Failed to read RpcRequest")?
    {
        debug!("Received {} request", request.method());
        let response = facade.dispatch(request);
        write_message(&mut writer, &response).context("Failed to write RpcResponse")?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
