//! Response middleware
//!
//! Stages run after the static file handler has produced a response, in the
//! order they were added: CORS decoration first, then access logging, so the
//! logged response is exactly what goes on the wire.

pub mod access_log;
pub mod cors;

pub use access_log::AccessLog;
pub use cors::Cors;

use crate::handler::RequestContext;
use crate::http::Body;
use hyper::Response;

/// A post-processing stage around the base handler
pub trait Middleware: Send + Sync {
    /// Process response after handler
    fn after(&self, ctx: &RequestContext, res: &mut Response<Body>);
}

/// Middleware chain
#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    #[must_use]
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every stage in insertion order
    pub fn run_after(&self, ctx: &RequestContext, res: &mut Response<Body>) {
        for m in &self.middlewares {
            m.after(ctx, res);
        }
    }
}
