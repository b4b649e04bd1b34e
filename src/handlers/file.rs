//! Static file serving.
//!
//! # Responsibilities
//! - Map context segments onto files under a root directory
//! - Serve `index.html` for directory paths
//! - Pick a content type from the file extension
//!
//! # Design Decisions
//! - Read-only: GET and HEAD only
//! - Segments arrive percent-decoded; `.`/`..` and embedded separators are
//!   refused outright, then the canonical path must still sit under the
//!   canonical root (catches symlink escapes)
//! - Anything missing or outside the root is reported as 404, so probing
//!   cannot tell the two apart

use bytes::Bytes;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::handlers::{ApiRequest, Handler, HandlerError, HandlerResult, Method, Payload};

const INDEX_FILE: &str = "index.html";

/// Serves files below `root_path`.
#[derive(Debug, Clone)]
pub struct FileHandler {
    root: PathBuf,
}

impl FileHandler {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `context` to a readable file under the root.
    fn resolve(&self, context: &[String]) -> Result<PathBuf, HandlerError> {
        let requested = format!("/{}", context.join("/"));
        let not_found = || HandlerError::not_found(format!("{} not found", requested));

        if context.iter().any(|s| !is_plain_segment(s)) {
            tracing::warn!(path = %requested, "Rejected path outside file root");
            return Err(not_found());
        }

        let root = fs::canonicalize(&self.root).map_err(|e| {
            tracing::error!(root = ?self.root, error = %e, "File root is not accessible");
            not_found()
        })?;

        let mut path = root.join(context.iter().collect::<PathBuf>());
        if path.is_dir() {
            path.push(INDEX_FILE);
        }

        let resolved = fs::canonicalize(&path).map_err(|_| not_found())?;
        if !resolved.starts_with(&root) {
            tracing::warn!(path = %requested, "Rejected path resolving outside file root");
            return Err(not_found());
        }
        if !resolved.is_file() {
            return Err(not_found());
        }
        Ok(resolved)
    }
}

impl Handler for FileHandler {
    fn supports(&self, method: Method) -> bool {
        matches!(method, Method::Get | Method::Head)
    }

    fn get(&self, request: &ApiRequest) -> HandlerResult {
        let path = self.resolve(&request.context)?;
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => HandlerError::not_found(
                format!("/{} not found", request.context.join("/")),
            ),
            _ => HandlerError::Internal(anyhow::Error::new(e).context(format!("reading {:?}", path))),
        })?;

        tracing::debug!(path = ?path, size = bytes.len(), "Serving file");
        Ok(Payload::File {
            content_type: content_type_for(&path),
            bytes: Bytes::from(bytes),
        })
    }
}

/// A segment that names an entry inside its parent directory.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
        && !Path::new(segment).has_root()
}

/// Content type from file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
