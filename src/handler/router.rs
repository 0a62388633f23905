//! Request pipeline module
//!
//! Entry point for HTTP request processing: resolve → decorate → log.

use crate::config::AppState;
use crate::http::Body;
use hyper::header::{HeaderMap, IF_MODIFIED_SINCE, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request information shared by the handler and the middleware stages
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw (still percent-encoded) URI path
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub remote_addr: SocketAddr,
    pub headers: HeaderMap,
    pub started: Instant,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, remote_addr: SocketAddr) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            remote_addr,
            headers: req.headers().clone(),
            started: Instant::now(),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    pub fn if_modified_since(&self) -> Option<&str> {
        self.headers
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
    }

    #[cfg(test)]
    pub(crate) fn for_test(method: &str, uri: &str) -> Self {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        Self::from_request(&req, SocketAddr::from(([127, 0, 0, 1], 54321)))
    }
}

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including I/O errors, is a response.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Body>, Infallible> {
    let ctx = RequestContext::from_request(&req, remote_addr);
    Ok(respond(&ctx, &state).await)
}

/// Run the pipeline for an already-parsed request
pub async fn respond(ctx: &RequestContext, state: &AppState) -> Response<Body> {
    let mut response = state.static_files.handle(ctx).await;

    if let Some(server) = &state.server_name {
        response.headers_mut().insert(SERVER, server.clone());
    }

    state.middleware.run_after(ctx, &mut response);
    response
}
