use crate::error::{ServerError, ServerResult};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};

/// Protocol version written on every response
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP Status Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 200,
    NotFound = 404,
}

impl Status {
    /// Numeric status code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code
    pub fn as_str(&self) -> &'static str {
        match *self {
            Status::Ok => "OK",
            Status::NotFound => "Not Found",
        }
    }
}

/// First line of a response: `<version> <code> <reason>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: String,
    pub code: String,
    pub reason: String,
}

impl StatusLine {
    /// Parse a status line, with or without its trailing CRLF.
    ///
    /// The line is split into at most three parts so that reason phrases
    /// containing spaces (`Not Found`) come back intact.
    pub fn parse(line: &str) -> ServerResult<Self> {
        let line = line.strip_suffix("\r\n").unwrap_or(line);
        let mut parts = line.splitn(3, ' ');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(version), Some(code), Some(reason))
                if !version.is_empty() && !code.is_empty() && !reason.is_empty() =>
            {
                Ok(Self {
                    version: version.to_string(),
                    code: code.to_string(),
                    reason: reason.to_string(),
                })
            }
            _ => Err(ServerError::MalformedRequest(format!(
                "Invalid status line: {:?}",
                line
            ))),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.code, self.reason)
    }
}

/// HTTP Parser State
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpParserState {
    RequestLine,
    Headers,
    Complete,
}

/// Reads exactly one request head (request line + headers) off a byte stream.
///
/// Lines must end in CRLF. The body, if any, is left unread in the stream.
pub struct HttpParser<R> {
    reader: R,
    state: HttpParserState,
    line: Vec<u8>,
}

impl<R: BufRead> HttpParser<R> {
    /// Create a new HTTP parser over a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: HttpParserState::RequestLine,
            line: Vec::with_capacity(256),
        }
    }

    /// Where the parser stopped; useful when reporting a failure
    pub fn state(&self) -> HttpParserState {
        self.state
    }

    /// Parse a single request.
    ///
    /// Either a fully populated [`Request`] comes back or
    /// [`ServerError::MalformedRequest`]; nothing partial is ever returned.
    pub fn parse(&mut self) -> ServerResult<Request> {
        self.state = HttpParserState::RequestLine;
        let line = self.read_line()?;
        let (method, path, version) = parse_request_line(&line)?;

        self.state = HttpParserState::Headers;
        let mut headers = HashMap::new();
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                break;
            }
            let (name, value) = parse_header(&line)?;
            headers.insert(name, value);
        }

        self.state = HttpParserState::Complete;
        Ok(Request {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
        })
    }

    /// Read one CRLF-terminated line and return it without the terminator
    fn read_line(&mut self) -> ServerResult<String> {
        self.line.clear();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(|e| ServerError::MalformedRequest(format!("Read failed: {}", e)))?;

        if bytes_read == 0 {
            return Err(ServerError::MalformedRequest(
                "Stream closed before end of request head".to_string(),
            ));
        }

        let Some(content) = self.line.strip_suffix(b"\r\n") else {
            return Err(ServerError::MalformedRequest(
                "Line not terminated by CRLF".to_string(),
            ));
        };

        String::from_utf8(content.to_vec())
            .map_err(|_| ServerError::MalformedRequest("Line is not valid UTF-8".to_string()))
    }
}

/// Split a request line into method, path and version.
///
/// Tokens after the third are ignored.
pub fn parse_request_line(line: &str) -> ServerResult<(String, String, String)> {
    let mut parts = line.split(' ');
    let fields = (parts.next(), parts.next(), parts.next());

    let (method, path, version) = match fields {
        (Some(method), Some(path), Some(version))
            if !method.is_empty() && !path.is_empty() && !version.is_empty() =>
        {
            (method, path, version)
        }
        _ => {
            return Err(ServerError::MalformedRequest(format!(
                "Invalid request line: {:?}",
                line
            )))
        }
    };

    if !path.starts_with('/') {
        return Err(ServerError::MalformedRequest(format!(
            "Request path must start with '/': {:?}",
            path
        )));
    }

    Ok((method.to_string(), path.to_string(), version.to_string()))
}

/// Split a header line on the first `": "`
pub fn parse_header(line: &str) -> ServerResult<(String, String)> {
    match line.split_once(": ") {
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(ServerError::MalformedRequest(format!(
            "Invalid header: {:?}",
            line
        ))),
    }
}

/// HTTP Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub version: String,
    /// Header names are case-sensitive; the last occurrence wins
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Create a new request with no headers
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            version: HTTP_VERSION.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Read one request off a buffered stream
    pub fn read_from<R: BufRead>(reader: R) -> ServerResult<Self> {
        HttpParser::new(reader).parse()
    }

    /// Set a header
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Get a header
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// HTTP Response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status: Status,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response with no headers and no body
    pub fn new(status: Status) -> Self {
        Self {
            version: HTTP_VERSION.to_string(),
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Set a header
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Get a header
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Set the body along with its Content-Type and Content-Length
    pub fn set_body(&mut self, content_type: &str, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        self.set_header("Content-Type", content_type);
        self.set_header("Content-Length", &self.body.len().to_string());
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine {
            version: self.version.clone(),
            code: self.status.code().to_string(),
            reason: self.status.as_str().to_string(),
        }
    }

    /// Serialize the response to its wire bytes.
    ///
    /// Headers come out in map iteration order, followed by the blank line
    /// and the raw body with no trailing terminator.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.body.len());

        out.extend_from_slice(self.status_line().to_string().as_bytes());
        out.extend_from_slice(b"\r\n");

        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }

        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    /// Write the serialized response and flush
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.serialize())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parser_tracks_state() {
        let mut parser = HttpParser::new(Cursor::new(b"GET / HTTP/1.1\r\nHost: x\r\n".to_vec()));
        assert_eq!(parser.state(), HttpParserState::RequestLine);

        // Headers never terminated by a blank line
        assert!(parser.parse().is_err());
        assert_eq!(parser.state(), HttpParserState::Headers);

        let mut parser = HttpParser::new(Cursor::new(b"GET / HTTP/1.1\r\n\r\n".to_vec()));
        parser.parse().unwrap();
        assert_eq!(parser.state(), HttpParserState::Complete);
    }

    #[test]
    fn test_bare_lf_is_rejected() {
        let result = Request::read_from(Cursor::new(b"GET / HTTP/1.1\n\n".to_vec()));
        assert!(matches!(result, Err(ServerError::MalformedRequest(_))));
    }

    #[test]
    fn test_request_line_fields() {
        let (method, path, version) = parse_request_line("GET /echo/abc HTTP/1.1").unwrap();
        assert_eq!(method, "GET");
        assert_eq!(path, "/echo/abc");
        assert_eq!(version, "HTTP/1.1");

        assert!(parse_request_line("GET /").is_err());
        assert!(parse_request_line("GET  HTTP/1.1").is_err());
        assert!(parse_request_line("GET index.html HTTP/1.1").is_err());
    }

    #[test]
    fn test_header_splits_on_first_separator() {
        let (name, value) = parse_header("X-Note: a: b").unwrap();
        assert_eq!(name, "X-Note");
        assert_eq!(value, "a: b");

        assert!(parse_header("Host:localhost").is_err());
    }

    #[test]
    fn test_empty_response_has_no_headers() {
        let response = Response::new(Status::NotFound);
        assert_eq!(response.serialize(), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }
}
