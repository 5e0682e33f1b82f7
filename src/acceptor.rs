use crate::connection::Connection;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Owns the listening socket and hands out accepted connections
pub struct ConnectionAcceptor {
    listener: TcpListener,
    connection_count: AtomicUsize,
}

impl ConnectionAcceptor {
    /// Create a new connection acceptor bound to the specified address
    pub fn new<A: ToSocketAddrs>(addr: A, backlog: i32) -> io::Result<Self> {
        let socket_addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "No socket addresses found")
        })?;

        let socket = Self::create_socket(&socket_addr, backlog)?;

        Ok(Self {
            listener: socket.into(),
            connection_count: AtomicUsize::new(0),
        })
    }

    /// Block until a peer connects
    pub fn accept(&self) -> io::Result<Connection<TcpStream>> {
        let (stream, addr) = self.listener.accept()?;
        let id = self.connection_count.fetch_add(1, Ordering::Relaxed);

        Ok(Connection::new(stream, addr.to_string(), id))
    }

    /// Get the local address this acceptor is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of connections accepted so far
    pub fn accepted(&self) -> usize {
        self.connection_count.load(Ordering::Relaxed)
    }

    fn create_socket(addr: &SocketAddr, backlog: i32) -> io::Result<Socket> {
        let domain = if addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };

        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

        // Restarting right after a shutdown must not fail on TIME_WAIT
        socket.set_reuse_address(true)?;
        socket.bind(&(*addr).into())?;
        socket.listen(backlog)?;

        Ok(socket)
    }
}
