use crate::acceptor::ConnectionAcceptor;
use crate::config::ServerConfig;
use crate::connection::Connection;
use crate::error::ServerResult;
use crate::metrics::ServerMetrics;
use crate::router::Router;
use log::{debug, error, info};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;

/// Accepts connections and serves each one on its own thread.
///
/// Workers share only the router (and the static-file config inside it)
/// and the metrics counters.
pub struct Server {
    acceptor: ConnectionAcceptor,
    router: Arc<Router>,
    metrics: Arc<ServerMetrics>,
}

impl Server {
    /// Bind the listening socket and serve requests with `router`
    pub fn bind(config: &ServerConfig, router: Router) -> ServerResult<Self> {
        let address = config.socket_address();
        let acceptor = ConnectionAcceptor::new(address.as_str(), config.backlog_size)?;
        info!("Listening on {}", acceptor.local_addr()?);

        Ok(Self {
            acceptor,
            router: Arc::new(router),
            metrics: Arc::new(ServerMetrics::new()),
        })
    }

    /// Bind with the standard route table
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        match &config.static_root {
            Some(root) => info!("Serving files from {}", root.display()),
            None => info!("No static file directory configured"),
        }
        let router = Router::with_default_routes(Arc::new(config.static_files()));
        Self::bind(config, router)
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.acceptor.local_addr()?)
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Accept connections forever.
    ///
    /// A failed accept is logged and the loop carries on; the loop itself
    /// never waits on a worker.
    pub fn run(&self) -> ServerResult<()> {
        loop {
            match self.acceptor.accept() {
                Ok(connection) => {
                    self.metrics.connections_accepted.increment(1);
                    self.spawn_worker(connection);
                }
                Err(e) => error!("Error accepting connection: {}", e),
            }
        }
    }

    fn spawn_worker(&self, connection: Connection<TcpStream>) {
        let id = connection.id();
        debug!("[conn {}] accepted from {}", id, connection.peer());

        let router = Arc::clone(&self.router);
        let metrics = Arc::clone(&self.metrics);

        // On failure the closure is dropped, and the connection with it
        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || connection.serve(&router, &metrics));

        if let Err(e) = spawned {
            error!("[conn {}] could not spawn worker: {}", id, e);
        }
    }
}
