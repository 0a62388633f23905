// Server loop module
// Accepts connections until shutdown, then drains the open ones

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::connection::spawn_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for one server instance
///
/// Runs until `shutdown` resolves. The listener is then closed, open
/// connections are told to finish their current request, and the loop waits
/// up to `server.shutdown_timeout` seconds for them before aborting the rest.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        spawn_connection(
                            &mut connections,
                            stream,
                            peer_addr,
                            Arc::clone(&state),
                            shutdown_rx.clone(),
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            // Reap finished connection tasks
            Some(_) = connections.join_next(), if !connections.is_empty() => {}

            () = &mut shutdown => break,
        }
    }

    // Stop accepting before waiting on anything else
    drop(listener);
    let _ = shutdown_tx.send(true);

    logger::log_draining(&state.console, connections.len());
    let drain_timeout = Duration::from_secs(state.config.server.shutdown_timeout);
    let drained = tokio::time::timeout(drain_timeout, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "Closing {} connection(s) still open after {}s",
            connections.len(),
            drain_timeout.as_secs()
        ));
        connections.shutdown().await;
    }

    logger::log_server_stopped(&state.console);
}
