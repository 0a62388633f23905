// Server module entry point
// Binds the listener and runs the accept loop until shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::{Result, ServerError};
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// A bound static file server
///
/// Each instance owns its listener and state, so several can run in one
/// process (tests bind port 0).
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    local_addr: SocketAddr,
}

impl Server {
    /// Resolve the root, open the access log and bind the listener.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: Config) -> Result<Self> {
        Self::bind_with_state(AppState::new(config)?)
    }

    pub fn bind_with_state(state: AppState) -> Result<Self> {
        let addr = state.config.get_socket_addr()?;
        let listener =
            create_listener(addr).map_err(|e| ServerError::Bind { addr, source: e })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            state: Arc::new(state),
            local_addr,
        })
    }

    /// Actual bound address (resolves port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Serve until `shutdown` resolves, then drain and return
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let state = &self.state;
        logger::log_server_start(&state.console, &self.local_addr, state.root());
        start_server_loop(self.listener, self.state, shutdown).await;
    }

    /// Serve until SIGINT/SIGTERM
    pub async fn run(self) {
        let state = Arc::clone(&self.state);
        self.run_until(async move {
            let name = signal::shutdown_signal().await;
            logger::log_shutdown_requested(&state.console, name);
        })
        .await;
    }
}
