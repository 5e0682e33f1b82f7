pub mod acceptor;
pub mod config;
pub mod connection;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod router;
pub mod server;
pub mod static_files;

/// Re-exports of common components for easier access
pub use acceptor::ConnectionAcceptor;
pub use config::ServerConfig;
pub use connection::{Connection, ConnectionState, Stream};
pub use error::{ServerError, ServerResult};
pub use http::{HttpParser, Request, Response, Status, StatusLine};
pub use metrics::{Counter, ServerMetrics};
pub use router::{RouteMatch, Router};
pub use server::Server;
pub use static_files::StaticFileConfig;
