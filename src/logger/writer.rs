//! Access log writer module
//!
//! Thread-safe line writer for access logs. Every line is flushed as soon as
//! it is written so output stays live when stdout is piped or redirected.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Append to file
    File(File),
    /// Caller-supplied sink
    Writer(Box<dyn Write + Send>),
}

/// Thread-safe access log writer
pub struct LogWriter {
    target: Mutex<LogTarget>,
}

impl LogWriter {
    pub const fn stdout() -> Self {
        Self {
            target: Mutex::new(LogTarget::Stdout),
        }
    }

    /// Append to `path`, creating it and its parent directories if needed
    pub fn file(path: &str) -> io::Result<Self> {
        let file = open_log_file(path)?;
        Ok(Self {
            target: Mutex::new(LogTarget::File(file)),
        })
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Mutex::new(LogTarget::Writer(Box::new(writer))),
        }
    }

    /// Write one line and flush it
    ///
    /// Best effort: a closed stream or full disk never fails the request.
    pub fn write_line(&self, message: &str) {
        let Ok(mut target) = self.target.lock() else {
            return;
        };
        let _ = match &mut *target {
            LogTarget::Stdout => write_flushed(&mut io::stdout().lock(), message),
            LogTarget::File(file) => write_flushed(file, message),
            LogTarget::Writer(writer) => write_flushed(writer, message),
        };
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

fn write_flushed(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{message}")?;
    out.flush()
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
