// Connection handling module
// Serves one accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a connection in a task owned by `tasks`.
///
/// The task:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.x with keep-alive through the request pipeline
/// 3. On shutdown, lets the in-flight request finish and then closes
///
/// # Arguments
///
/// * `tasks` - Connection tasks of the owning server loop
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, used for access logs
/// * `state` - Shared application state
/// * `shutdown` - Flips to `true` when the server stops accepting
pub fn spawn_connection(
    tasks: &mut JoinSet<()>,
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) {
    tasks.spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            handler::handle_request(req, peer_addr, Arc::clone(&state))
        });

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service);
        tokio::pin!(conn);

        let result = tokio::select! {
            result = conn.as_mut() => result,
            _ = shutdown.changed() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }
    });
}
