use crate::error::{ServerError, ServerResult};
use crate::http::{Request, Response, Status};
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

/// Content type for every file served
pub const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Configuration for the static file server.
///
/// Built once at startup and shared read-only with the file handler.
#[derive(Clone, Debug, Default)]
pub struct StaticFileConfig {
    /// The root directory to serve files from; `None` means every file
    /// request is answered with 404
    pub root_dir: Option<PathBuf>,
}

impl StaticFileConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: Some(root_dir.into()),
        }
    }

    /// Read a file under the root in full.
    ///
    /// The name is joined as given; `..` and absolute names are not filtered.
    pub fn read_file(&self, file_name: &str) -> ServerResult<Vec<u8>> {
        let root = self.root_dir.as_ref().ok_or_else(|| {
            ServerError::Config("No static file directory configured".to_string())
        })?;

        let path = root.join(file_name);
        fs::read(&path).map_err(|source| ServerError::FileRead { path, source })
    }
}

/// Third `/`-separated segment of the path, i.e. `name` in `/files/name`
fn file_name_from_path(path: &str) -> Option<&str> {
    path.split('/').nth(2)
}

/// Serve `/files/<name>` from the configured root.
///
/// Any failure to produce the file (no name, no root, missing, unreadable)
/// becomes a bare 404.
pub fn serve_file(request: &Request, config: &StaticFileConfig) -> Response {
    let Some(file_name) = file_name_from_path(&request.path) else {
        debug!("No file name in path {}", request.path);
        return Response::new(Status::NotFound);
    };

    match config.read_file(file_name) {
        Ok(contents) => {
            debug!("Serving {} ({} bytes)", file_name, contents.len());
            let mut response = Response::new(Status::Ok);
            response.set_body(FILE_CONTENT_TYPE, contents);
            response
        }
        Err(e) => {
            warn!("{}", e);
            Response::new(Status::NotFound)
        }
    }
}
