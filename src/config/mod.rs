// Configuration module entry point
// Loads the immutable server configuration and builds the shared request state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, CorsConfig, HttpConfig, LoggingConfig, ServerConfig};

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Environment prefix, e.g. `STATIC_SERVER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "STATIC_SERVER";

impl Config {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; anything it leaves out falls back to the
    /// section defaults. Environment variables override the file.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("http.index_files")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| ServerError::InvalidAddress { addr, source: e })
    }

    /// Canonical form of the served directory
    ///
    /// Fails when the directory does not exist or is not a directory, so a
    /// typo in `server.root` is caught at startup rather than as a stream of 404s.
    pub fn resolve_root(&self) -> Result<PathBuf, ServerError> {
        let root = PathBuf::from(&self.server.root);
        let canonical = root.canonicalize().map_err(|e| ServerError::Root {
            path: root.clone(),
            source: e,
        })?;
        if !canonical.is_dir() {
            return Err(ServerError::Root {
                path: root,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(canonical)
    }
}
