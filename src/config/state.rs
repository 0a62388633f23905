// Application state module
// Read-only state shared by every connection of one server instance

use hyper::header::HeaderValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::types::Config;
use crate::error::ServerError;
use crate::handler::StaticFiles;
use crate::logger::{self, LogWriter};
use crate::middleware::{AccessLog, Cors, MiddlewareChain};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical served directory
    pub root: PathBuf,
    pub static_files: StaticFiles,
    /// Post-handler stages: CORS decoration, then access logging
    pub middleware: MiddlewareChain,
    pub server_name: Option<HeaderValue>,
    /// Lifecycle messages: startup banner, shutdown notices
    pub console: LogWriter,
}

impl AppState {
    /// Build state with the access log target named by `logging.access_log_file`
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let writer = match &config.logging.access_log_file {
            Some(path) => LogWriter::file(path).map_err(|e| ServerError::AccessLog {
                path: path.clone(),
                source: e,
            })?,
            None => LogWriter::stdout(),
        };
        Self::with_log_writer(config, writer)
    }

    /// Build state logging requests to `writer`
    pub fn with_log_writer(config: Config, writer: LogWriter) -> Result<Self, ServerError> {
        let root = config.resolve_root()?;
        let static_files = StaticFiles::new(root.clone(), &config.http);

        let mut middleware = MiddlewareChain::new().with(Cors::new(&config.cors));
        if config.logging.access_log {
            middleware.add(AccessLog::new(
                Arc::new(writer),
                config.logging.access_log_format.clone(),
            ));
        }

        let server_name = if config.http.server_name.is_empty() {
            None
        } else {
            match HeaderValue::from_str(&config.http.server_name) {
                Ok(v) => Some(v),
                Err(e) => {
                    logger::log_warning(&format!(
                        "Ignoring invalid server name '{}': {e}",
                        config.http.server_name
                    ));
                    None
                }
            }
        };

        Ok(Self {
            config,
            root,
            static_files,
            middleware,
            server_name,
            console: LogWriter::stdout(),
        })
    }

    /// Send lifecycle messages to `console` instead of stdout
    #[must_use]
    pub fn with_console(mut self, console: LogWriter) -> Self {
        self.console = console;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &Path) -> Config {
        let mut config = Config::default();
        config.server.root = dir.to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_chain_without_access_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        config.logging.access_log = false;
        let state = AppState::new(config).unwrap();
        assert_eq!(state.middleware.len(), 1);
        assert_eq!(state.root(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_access_log_file_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        let log_path = dir.path().join("logs/access.log");
        config.logging.access_log_file = Some(log_path.to_string_lossy().into_owned());
        let state = AppState::new(config).unwrap();
        assert_eq!(state.middleware.len(), 2);
        assert!(log_path.exists());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("nope"));
        assert!(matches!(
            AppState::new(config),
            Err(ServerError::Root { .. })
        ));
    }
}
