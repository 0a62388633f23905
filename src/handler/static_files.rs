//! Static file serving module
//!
//! Maps request paths onto files below a root directory, with index files,
//! directory listings and `If-Modified-Since` support.

use super::listing;
use super::RequestContext;
use crate::config::HttpConfig;
use crate::http::{self, date, mime, Body};
use crate::logger;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Why a request path could not be mapped below the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Not valid UTF-8 after decoding, or a segment that is not a plain name
    Malformed,
    /// `..` segments climb above the root
    Traversal,
}

/// Decode a request path and normalize it into a path relative to the root
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// A `..` with nothing left to remove is a traversal attempt.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use static_cors_server::handler::static_files::{resolve_request_path, PathError};
/// assert_eq!(resolve_request_path("/css/../js/app.js"), Ok(PathBuf::from("js/app.js")));
/// assert_eq!(resolve_request_path("/my%20file.txt"), Ok(PathBuf::from("my file.txt")));
/// assert_eq!(resolve_request_path("/../../etc/passwd"), Err(PathError::Traversal));
/// ```
pub fn resolve_request_path(raw: &str) -> Result<PathBuf, PathError> {
    let decoded = urlencoding::decode(raw).map_err(|_| PathError::Malformed)?;
    let mut segments: Vec<&str> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathError::Traversal);
                }
            }
            name if !is_plain_name(name) => return Err(PathError::Malformed),
            name => segments.push(name),
        }
    }

    Ok(segments.iter().collect())
}

/// A single normal path component with no separators, prefixes or NULs
fn is_plain_name(segment: &str) -> bool {
    if segment.contains(['\0', '\\']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Outcome of confining a path that cannot be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denied {
    NotFound,
    Forbidden,
}

/// Static file handler rooted at one directory
pub struct StaticFiles {
    root: PathBuf,
    index_files: Vec<String>,
    listing: bool,
}

impl StaticFiles {
    /// `root` must already be canonical; it is the confinement boundary.
    pub fn new(root: PathBuf, config: &HttpConfig) -> Self {
        Self {
            root,
            index_files: config.index_files.clone(),
            listing: config.directory_listing,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Produce the response for a request, before any decoration
    pub async fn handle(&self, ctx: &RequestContext) -> Response<Body> {
        let is_head = ctx.is_head();
        match ctx.method {
            Method::GET | Method::HEAD => {}
            Method::OPTIONS => return http::build_options_response(),
            _ => return http::build_405_response(is_head),
        }

        let relative = match resolve_request_path(&ctx.path) {
            Ok(p) => p,
            Err(PathError::Malformed) => return http::build_400_response(is_head),
            Err(PathError::Traversal) => {
                logger::log_warning(&format!(
                    "Path traversal attempt blocked: {}",
                    ctx.path
                ));
                return http::build_403_response(is_head);
            }
        };

        let target = match self.confine(&self.root.join(&relative)).await {
            Ok(p) => p,
            Err(Denied::NotFound) => return http::build_404_response(is_head),
            Err(Denied::Forbidden) => return http::build_403_response(is_head),
        };

        let meta = match fs::metadata(&target).await {
            Ok(m) => m,
            Err(e) => return io_error_response(&target, &e, is_head),
        };

        if meta.is_dir() {
            return self.serve_directory(ctx, &target, &relative).await;
        }

        // A trailing slash names a directory; files never match it
        if ctx.path.ends_with('/') {
            return http::build_404_response(is_head);
        }

        serve_file(ctx, &target, &meta).await
    }

    /// Canonicalize `path` and make sure it is still below the root
    ///
    /// Catches symlinks that point outside the served directory.
    async fn confine(&self, path: &Path) -> Result<PathBuf, Denied> {
        let canonical = match fs::canonicalize(path).await {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Err(Denied::Forbidden),
            // Missing file, or a file used as a directory
            Err(_) => return Err(Denied::NotFound),
        };

        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                path.display(),
                canonical.display()
            ));
            Err(Denied::Forbidden)
        }
    }

    async fn serve_directory(
        &self,
        ctx: &RequestContext,
        dir: &Path,
        relative: &Path,
    ) -> Response<Body> {
        let is_head = ctx.is_head();

        // Relative links in the page only work with a trailing slash
        if !ctx.path.ends_with('/') {
            let location = directory_location(relative, ctx.query.as_deref());
            return http::build_301_response(&location);
        }

        for index in &self.index_files {
            let Ok(candidate) = self.confine(&dir.join(index)).await else {
                continue;
            };
            if let Ok(meta) = fs::metadata(&candidate).await {
                if meta.is_file() {
                    return serve_file(ctx, &candidate, &meta).await;
                }
            }
        }

        if !self.listing {
            return http::build_403_response(is_head);
        }

        match listing::read_entries(dir).await {
            Ok(entries) => {
                let display_path = display_path(relative);
                let html = listing::render_listing(&display_path, &entries);
                http::response::build_html_response(html, is_head)
            }
            Err(e) => io_error_response(dir, &e, is_head),
        }
    }
}

/// `/`-separated, slash-terminated form of a relative directory path
fn display_path(relative: &Path) -> String {
    let mut out = String::from("/");
    for component in relative.components() {
        out.push_str(&component.as_os_str().to_string_lossy());
        out.push('/');
    }
    out
}

/// Redirect target for a directory requested without its trailing slash
///
/// Built from the normalized path, never the raw one: a raw `//host/..`
/// would turn into a protocol-relative URL pointing at another site.
fn directory_location(relative: &Path, query: Option<&str>) -> String {
    let mut location = String::from("/");
    for component in relative.components() {
        location.push_str(&urlencoding::encode(&component.as_os_str().to_string_lossy()));
        location.push('/');
    }
    if let Some(q) = query {
        location.push('?');
        location.push_str(q);
    }
    location
}

async fn serve_file(ctx: &RequestContext, path: &Path, meta: &std::fs::Metadata) -> Response<Body> {
    let is_head = ctx.is_head();
    let last_modified = meta.modified().ok();

    if let (Some(since), Some(modified)) = (ctx.if_modified_since(), last_modified) {
        if date::not_modified_since(since, modified) {
            return http::build_304_response(&date::format_http_date(modified));
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(path, &e, is_head),
    };

    http::response::build_file_response(
        Bytes::from(content),
        mime::content_type_for(path),
        last_modified.map(date::format_http_date).as_deref(),
        is_head,
    )
}

/// Map a filesystem error met while serving into a response
fn io_error_response(path: &Path, error: &io::Error, is_head: bool) -> Response<Body> {
    match error.kind() {
        io::ErrorKind::NotFound => http::build_404_response(is_head),
        io::ErrorKind::PermissionDenied => http::build_403_response(is_head),
        _ => {
            logger::log_error(&format!(
                "Failed to read '{}': {}",
                path.display(),
                error
            ));
            http::build_500_response(is_head)
        }
    }
}
