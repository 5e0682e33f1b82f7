//! Fixed route handlers.
//!
//! Each handler maps a parsed request to a response without touching the
//! connection. The file handler lives in [`crate::static_files`].

use crate::error::ServerResult;
use crate::http::{Request, Response, Status};

pub const TEXT_CONTENT_TYPE: &str = "text/plain";

const ECHO_PREFIX: &str = "/echo/";

/// `GET /`: 200 with no headers and no body
pub fn root_handler(_request: &Request) -> ServerResult<Response> {
    Ok(Response::new(Status::Ok))
}

/// Everything after the first `/echo/` in the path, sent back as plain text
pub fn echo_handler(request: &Request) -> ServerResult<Response> {
    let message = request
        .path
        .split_once(ECHO_PREFIX)
        .map(|(_, rest)| rest)
        .unwrap_or("");

    let mut response = Response::new(Status::Ok);
    response.set_body(TEXT_CONTENT_TYPE, message);
    Ok(response)
}

/// The `User-Agent` request header as plain text, empty when absent
pub fn user_agent_handler(request: &Request) -> ServerResult<Response> {
    let user_agent = request.get_header("User-Agent").unwrap_or("");

    let mut response = Response::new(Status::Ok);
    response.set_body(TEXT_CONTENT_TYPE, user_agent);
    Ok(response)
}

pub fn not_found_handler(_request: &Request) -> ServerResult<Response> {
    Ok(Response::new(Status::NotFound))
}
