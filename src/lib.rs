//! Local static file server with permissive CORS headers.
//!
//! Serves a directory tree over HTTP/1.1, appends the configured
//! `Access-Control-Allow-*` headers to every response, writes one access log
//! line per request and drains open connections on SIGINT/SIGTERM.
//!
//! ```no_run
//! use static_cors_server::{Config, Server};
//!
//! # async fn run() -> static_cors_server::Result<()> {
//! let server = Server::bind(Config::load()?)?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
