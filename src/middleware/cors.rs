//! CORS (Cross-Origin Resource Sharing) middleware
//!
//! Appends the configured cross-origin headers to every response, whatever
//! its status, so browser clients on another origin are never blocked.

use super::Middleware;
use crate::config::CorsConfig;
use crate::handler::RequestContext;
use crate::http::Body;
use crate::logger;
use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::Response;

/// CORS middleware
pub struct Cors {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl Cors {
    /// Header values are validated once, here; an unusable value is logged
    /// and replaced by the default for that header.
    pub fn new(config: &CorsConfig) -> Self {
        let defaults = CorsConfig::default();
        let headers = [
            (
                ACCESS_CONTROL_ALLOW_ORIGIN,
                &config.allow_origin,
                defaults.allow_origin,
            ),
            (
                ACCESS_CONTROL_ALLOW_METHODS,
                &config.allow_methods,
                defaults.allow_methods,
            ),
            (
                ACCESS_CONTROL_ALLOW_HEADERS,
                &config.allow_headers,
                defaults.allow_headers,
            ),
        ]
        .into_iter()
        .map(|(name, value, fallback)| {
            let value = HeaderValue::from_str(value).unwrap_or_else(|e| {
                logger::log_warning(&format!(
                    "Invalid {name} value '{value}': {e}, using '{fallback}'"
                ));
                HeaderValue::from_str(&fallback).unwrap_or(HeaderValue::from_static("*"))
            });
            (name, value)
        })
        .collect();

        Self { headers }
    }

    /// Simple CORS - allow all origins
    pub fn permissive() -> Self {
        Self::new(&CorsConfig::default())
    }
}

impl Middleware for Cors {
    fn after(&self, _ctx: &RequestContext, res: &mut Response<Body>) {
        let headers = res.headers_mut();
        for (name, value) in &self.headers {
            headers.append(name.clone(), value.clone());
        }
    }
}
