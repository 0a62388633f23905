//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle messages, written to the instance's console [`LogWriter`]
//! - Error and warning logging (stderr)
//! - Access logging with multiple formats through [`LogWriter`]

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogWriter;

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;

/// Write to stderr
fn write_error(message: &str) {
    let _ = writeln!(std::io::stderr().lock(), "{message}");
}

pub fn log_server_start(out: &LogWriter, addr: &SocketAddr, root: &Path) {
    out.write_line(&format!(
        "Serving HTTP on {} port {} (http://{addr}/)",
        addr.ip(),
        addr.port()
    ));
    out.write_line(&format!("Serving files from: {}", root.display()));
}

pub fn log_shutdown_requested(out: &LogWriter, signal: &str) {
    out.write_line(&format!("\nReceived {signal}, shutting down..."));
}

pub fn log_draining(out: &LogWriter, active: usize) {
    if active > 0 {
        out.write_line(&format!("Waiting for {active} open connection(s) to finish"));
    }
}

pub fn log_server_stopped(out: &LogWriter) {
    out.write_line("Server stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
