use crate::error::{ServerError, ServerResult};
use crate::http::{Request, Response};
use crate::metrics::ServerMetrics;
use crate::router::Router;
use log::{debug, error, info, warn};
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A bidirectional byte stream a connection can be served over
pub trait Stream: Read + Write {
    /// Close both directions of the stream
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Stream for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Represents the current state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Reading,
    Routing,
    Responding,
    Closed,
}

/// One accepted connection, served exactly once.
///
/// The stream is shut down when the connection is dropped, whichever way
/// processing ended.
pub struct Connection<S: Stream> {
    stream: S,
    peer: String,
    id: usize,
    state: ConnectionState,
}

impl<S: Stream> Connection<S> {
    pub fn new(stream: S, peer: impl Into<String>, id: usize) -> Self {
        Self {
            stream,
            peer: peer.into(),
            id,
            state: ConnectionState::Reading,
        }
    }

    /// Get the connection's unique ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get the connection's peer address
    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn set_state(&mut self, state: ConnectionState) {
        debug!("[conn {}] {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
    }

    /// Parse one request, route it and write the response back.
    ///
    /// Stops at the first failing stage; nothing is written if parsing or
    /// the handler fails.
    pub fn process(&mut self, router: &Router) -> ServerResult<Response> {
        self.set_state(ConnectionState::Reading);
        let request = Request::read_from(BufReader::new(&mut self.stream))?;

        self.set_state(ConnectionState::Routing);
        let response = router.handle_request(&request)?;

        self.set_state(ConnectionState::Responding);
        response
            .write_to(&mut self.stream)
            .map_err(ServerError::WriteFailure)?;

        info!(
            "{} \"{} {} {}\" {} {}",
            self.peer,
            request.method,
            request.path,
            request.version,
            response.status.code(),
            response.body.len()
        );
        Ok(response)
    }

    /// Serve the connection and close it. Errors are logged and counted,
    /// never retried.
    pub fn serve(mut self, router: &Router, metrics: &ServerMetrics) {
        match self.process(router) {
            Ok(_) => metrics.responses_sent.increment(1),
            Err(ServerError::MalformedRequest(reason)) => {
                metrics.malformed_requests.increment(1);
                warn!("[conn {}] {}: malformed request: {}", self.id, self.peer, reason);
            }
            Err(e @ ServerError::WriteFailure(_)) => {
                metrics.write_failures.increment(1);
                error!("[conn {}] {}: {}", self.id, self.peer, e);
            }
            Err(e) => {
                metrics.handler_failures.increment(1);
                error!("[conn {}] {}: handler failed: {}", self.id, self.peer, e);
            }
        }
    }
}

impl<S: Stream> Drop for Connection<S> {
    fn drop(&mut self) {
        self.set_state(ConnectionState::Closed);
        if let Err(e) = self.stream.shutdown() {
            // The peer may already be gone
            if e.kind() != io::ErrorKind::NotConnected {
                debug!("[conn {}] shutdown failed: {}", self.id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Status;
    use crate::router::RouteMatch;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory stream recording what was written and whether it was closed
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Arc<Mutex<Vec<u8>>>,
        closed: Arc<AtomicBool>,
        fail_writes: bool,
    }

    struct Probe {
        output: Arc<Mutex<Vec<u8>>>,
        closed: Arc<AtomicBool>,
    }

    fn mock(input: &[u8], fail_writes: bool) -> (MockStream, Probe) {
        let output = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let stream = MockStream {
            input: Cursor::new(input.to_vec()),
            output: Arc::clone(&output),
            closed: Arc::clone(&closed),
            fail_writes,
        };
        (stream, Probe { output, closed })
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"));
            }
            self.output.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Stream for MockStream {
        fn shutdown(&mut self) -> io::Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn echo_router() -> Router {
        let mut router = Router::new();
        router.add_route(RouteMatch::contains("/echo/"), crate::handlers::echo_handler);
        router
    }

    #[test]
    fn test_serves_and_closes() {
        let (stream, probe) = mock(b"GET /echo/pear HTTP/1.1\r\nHost: x\r\n\r\n", false);
        let metrics = ServerMetrics::new();

        Connection::new(stream, "test", 1).serve(&echo_router(), &metrics);

        let output = probe.output.lock().unwrap().clone();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\npear"));
        assert!(probe.closed.load(Ordering::SeqCst));
        assert_eq!(metrics.responses_sent.value(), 1);
    }

    #[test]
    fn test_malformed_request_closes_silently() {
        let (stream, probe) = mock(b"GET /echo/pear HTTP/1.1", false);
        let metrics = ServerMetrics::new();

        Connection::new(stream, "test", 2).serve(&echo_router(), &metrics);

        assert!(probe.output.lock().unwrap().is_empty());
        assert!(probe.closed.load(Ordering::SeqCst));
        assert_eq!(metrics.malformed_requests.value(), 1);
        assert_eq!(metrics.responses_sent.value(), 0);
    }

    #[test]
    fn test_write_failure_closes() {
        let (stream, probe) = mock(b"GET /echo/pear HTTP/1.1\r\n\r\n", true);
        let metrics = ServerMetrics::new();

        Connection::new(stream, "test", 3).serve(&echo_router(), &metrics);

        assert!(probe.closed.load(Ordering::SeqCst));
        assert_eq!(metrics.write_failures.value(), 1);
    }

    #[test]
    fn test_handler_failure_closes_without_response() {
        let mut router = Router::new();
        router.add_route(RouteMatch::exact("/boom"), |_| {
            Err(ServerError::Io(io::Error::new(io::ErrorKind::Other, "boom")))
        });
        let (stream, probe) = mock(b"GET /boom HTTP/1.1\r\n\r\n", false);
        let metrics = ServerMetrics::new();

        Connection::new(stream, "test", 4).serve(&router, &metrics);

        assert!(probe.output.lock().unwrap().is_empty());
        assert!(probe.closed.load(Ordering::SeqCst));
        assert_eq!(metrics.handler_failures.value(), 1);
    }

    #[test]
    fn test_process_reports_state() {
        let (stream, _probe) = mock(b"GET /nowhere HTTP/1.1\r\n\r\n", false);
        let mut connection = Connection::new(stream, "test", 5);
        assert_eq!(connection.state(), ConnectionState::Reading);

        let response = connection.process(&echo_router()).unwrap();
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(connection.state(), ConnectionState::Responding);
    }
}
