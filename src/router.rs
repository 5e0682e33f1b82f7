use crate::error::{ServerError, ServerResult};
use crate::handlers::{echo_handler, not_found_handler, root_handler, user_agent_handler};
use crate::http::{Request, Response};
use crate::static_files::{serve_file, StaticFileConfig};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// A handler function for processing HTTP requests
pub type HandlerFn = Arc<dyn Fn(&Request) -> ServerResult<Response> + Send + Sync>;

/// Predicate a route applies to the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// Path contains the pattern anywhere
    Contains(String),
    /// Path equals the pattern
    Exact(String),
}

impl RouteMatch {
    pub fn contains(pattern: &str) -> Self {
        RouteMatch::Contains(pattern.to_string())
    }

    pub fn exact(pattern: &str) -> Self {
        RouteMatch::Exact(pattern.to_string())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RouteMatch::Contains(pattern) => path.contains(pattern.as_str()),
            RouteMatch::Exact(pattern) => path == pattern,
        }
    }
}

/// A route entry in the router
#[derive(Clone)]
struct RouteEntry {
    matcher: RouteMatch,
    handler: HandlerFn,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("matcher", &self.matcher)
            .field("handler", &"<function>")
            .finish()
    }
}

/// Ordered list of routes; the first route whose predicate matches wins.
#[derive(Clone)]
pub struct Router {
    routes: Vec<RouteEntry>,
    not_found_handler: HandlerFn,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("not_found_handler", &"<function>")
            .finish()
    }
}

impl Router {
    /// Create a router with no routes and a bare 404 fallback
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            not_found_handler: Arc::new(not_found_handler),
        }
    }

    /// The server's route table, in precedence order:
    /// `/files`, `/user-agent`, `/echo/`, then exactly `/`.
    pub fn with_default_routes(static_files: Arc<StaticFileConfig>) -> Self {
        let mut router = Self::new();

        router
            .add_route(RouteMatch::contains("/files"), move |req| {
                Ok(serve_file(req, &static_files))
            })
            .add_route(RouteMatch::contains("/user-agent"), user_agent_handler)
            .add_route(RouteMatch::contains("/echo/"), echo_handler)
            .add_route(RouteMatch::exact("/"), root_handler);

        router
    }

    /// Append a route; it is tried after every route already registered
    pub fn add_route<F>(&mut self, matcher: RouteMatch, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> ServerResult<Response> + Send + Sync + 'static,
    {
        self.routes.push(RouteEntry {
            matcher,
            handler: Arc::new(handler),
        });

        self
    }

    /// Set the not found handler
    pub fn set_not_found_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> ServerResult<Response> + Send + Sync + 'static,
    {
        self.not_found_handler = Arc::new(handler);
        self
    }

    /// Number of registered routes, excluding the fallback
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the handler of the first route matching `path`
    pub fn find(&self, path: &str) -> ServerResult<&HandlerFn> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| {
                debug!("Route {:?} matched {}", route.matcher, path);
                &route.handler
            })
            .ok_or_else(|| ServerError::HandlerNotFound(path.to_string()))
    }

    /// Handle a request
    pub fn handle_request(&self, request: &Request) -> ServerResult<Response> {
        match self.find(&request.path) {
            Ok(handler) => handler(request),
            Err(e) => {
                debug!("{}", e);
                (self.not_found_handler)(request)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
