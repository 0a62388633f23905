//! Access log middleware
//!
//! Emits exactly one line per handled request, after the response is final.

use super::Middleware;
use crate::handler::RequestContext;
use crate::http::Body;
use crate::logger::{AccessLogEntry, LogWriter};
use hyper::body::Body as _;
use hyper::header::{REFERER, USER_AGENT};
use hyper::{Response, Version};
use std::sync::Arc;

pub struct AccessLog {
    writer: Arc<LogWriter>,
    format: String,
}

impl AccessLog {
    pub fn new(writer: Arc<LogWriter>, format: impl Into<String>) -> Self {
        Self {
            writer,
            format: format.into(),
        }
    }

    pub fn entry(ctx: &RequestContext, res: &Response<Body>) -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            ctx.remote_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.clone(),
        );
        entry.query.clone_from(&ctx.query);
        entry.http_version = version_str(ctx.version).to_string();
        entry.status = res.status().as_u16();
        entry.body_bytes = res
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_string(ctx, REFERER);
        entry.user_agent = header_string(ctx, USER_AGENT);
        entry.request_time_us =
            u64::try_from(ctx.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry
    }
}

impl Middleware for AccessLog {
    fn after(&self, ctx: &RequestContext, res: &mut Response<Body>) {
        let line = Self::entry(ctx, res).format(&self.format);
        self.writer.write_line(&line);
    }
}

fn header_string(ctx: &RequestContext, name: hyper::header::HeaderName) -> Option<String> {
    ctx.headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
