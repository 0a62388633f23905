//! End-to-end tests over real TCP connections

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use static_cors_server::config::AppState;
use static_cors_server::logger::LogWriter;
use static_cors_server::{Config, Server, ServerError};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut *self.0.lock().unwrap(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
    logs: SharedBuf,
    console: SharedBuf,
    _dir: TempDir,
}

impl TestServer {
    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(3), self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap();
    }
}

/// tmp/
///   secret.txt
///   site/
///     hello.txt
///     docs/a.txt
///     app/index.html
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("site");
    std::fs::create_dir_all(site.join("docs")).unwrap();
    std::fs::create_dir_all(site.join("app")).unwrap();
    std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
    std::fs::write(site.join("hello.txt"), "hello world").unwrap();
    std::fs::write(site.join("docs/a.txt"), "a").unwrap();
    std::fs::write(site.join("app/index.html"), "<h1>app</h1>").unwrap();
    dir
}

fn test_config(root: &Path, port: u16) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    config.server.root = root.to_string_lossy().into_owned();
    config.server.shutdown_timeout = 2;
    config
}

async fn start() -> TestServer {
    let dir = fixture();
    let logs = SharedBuf::default();
    let console = SharedBuf::default();
    let state = AppState::with_log_writer(
        test_config(&dir.path().join("site"), 0),
        LogWriter::from_writer(logs.clone()),
    )
    .unwrap()
    .with_console(LogWriter::from_writer(console.clone()));
    let server = Server::bind_with_state(state).unwrap();
    let addr = server.local_addr();

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        shutdown: Some(tx),
        handle,
        logs,
        console,
        _dir: dir,
    }
}

async fn send(addr: SocketAddr, method: &str, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request =
        format!("{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

fn body(response: &str) -> &str {
    response.split_once("\r\n\r\n").map_or("", |(_, b)| b)
}

fn assert_cors(response: &str) {
    let lower = response.to_ascii_lowercase();
    assert!(lower.contains("access-control-allow-origin: *\r\n"), "{response}");
    assert!(
        lower.contains("access-control-allow-methods: get, post, options\r\n"),
        "{response}"
    );
    assert!(
        lower.contains("access-control-allow-headers: content-type\r\n"),
        "{response}"
    );
}

#[tokio::test]
async fn test_serves_file_with_cors_headers() {
    let server = start().await;

    let response = send(server.addr, "GET", "/hello.txt").await;
    assert!(status_line(&response).starts_with("HTTP/1.1 200"), "{response}");
    assert_eq!(body(&response), "hello world");
    assert!(response
        .to_ascii_lowercase()
        .contains("content-type: text/plain"));
    assert_cors(&response);

    server.stop().await;
}

#[tokio::test]
async fn test_every_status_carries_cors_headers() {
    let server = start().await;

    let cases = [
        ("GET", "/missing.txt", "404"),
        ("GET", "/../secret.txt", "403"),
        ("POST", "/hello.txt", "405"),
        ("OPTIONS", "/hello.txt", "204"),
        ("GET", "/docs", "301"),
        ("GET", "/docs/", "200"),
        ("GET", "/app/", "200"),
    ];
    for (method, target, status) in cases {
        let response = send(server.addr, method, target).await;
        assert!(
            status_line(&response).starts_with(&format!("HTTP/1.1 {status}")),
            "{method} {target}: {response}"
        );
        assert_cors(&response);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_traversal_never_leaks_outside_root() {
    let server = start().await;

    for target in ["/../secret.txt", "/%2e%2e/secret.txt", "/docs/%2E%2E/%2E%2E/secret.txt"] {
        let response = send(server.addr, "GET", target).await;
        assert!(!response.contains("top secret"), "{target}: {response}");
        assert!(status_line(&response).starts_with("HTTP/1.1 403"), "{target}: {response}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_directory_handling() {
    let server = start().await;

    let redirect = send(server.addr, "GET", "/docs?x=1").await;
    assert!(redirect
        .to_ascii_lowercase()
        .contains("location: /docs/?x=1\r\n"));

    let listing = send(server.addr, "GET", "/docs/").await;
    assert!(body(&listing).contains("Directory listing for /docs/"));
    assert!(body(&listing).contains("<a href=\"a.txt\">a.txt</a>"));

    let offsite = send(server.addr, "GET", "//evil.example/%2e%2e/docs").await;
    assert!(status_line(&offsite).starts_with("HTTP/1.1 301"), "{offsite}");
    assert!(offsite.to_ascii_lowercase().contains("location: /docs/\r\n"), "{offsite}");

    let index = send(server.addr, "GET", "/app/").await;
    assert_eq!(body(&index), "<h1>app</h1>");

    server.stop().await;
}

#[tokio::test]
async fn test_post_is_rejected_with_allow_header() {
    let server = start().await;

    let response = send(server.addr, "POST", "/hello.txt").await;
    assert!(status_line(&response).starts_with("HTTP/1.1 405"));
    assert!(response
        .to_ascii_lowercase()
        .contains("allow: get, head, options\r\n"));
    assert!(!response.contains("hello world"));

    server.stop().await;
}

#[tokio::test]
async fn test_head_has_no_body() {
    let server = start().await;

    let response = send(server.addr, "HEAD", "/hello.txt").await;
    assert!(status_line(&response).starts_with("HTTP/1.1 200"));
    assert_eq!(body(&response), "");
    assert_cors(&response);

    server.stop().await;
}

#[tokio::test]
async fn test_one_log_line_per_request() {
    let server = start().await;

    send(server.addr, "GET", "/hello.txt").await;
    send(server.addr, "GET", "/missing.txt").await;
    send(server.addr, "POST", "/hello.txt").await;

    let lines = server.logs.lines();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].contains("\"GET /hello.txt HTTP/1.1\" 200 11"));
    assert!(lines[1].contains("\"GET /missing.txt HTTP/1.1\" 404"));
    assert!(lines[2].contains("\"POST /hello.txt HTTP/1.1\" 405"));

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_idle_keep_alive_and_listener() {
    let server = start().await;
    let addr = server.addr;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /hello.txt HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !String::from_utf8_lossy(&buf).contains("hello world") {
        let n = stream.read(&mut chunk).await.unwrap();
        assert_ne!(n, 0, "connection closed before response");
        buf.extend_from_slice(&chunk[..n]);
    }

    server.stop().await;

    // The idle keep-alive connection is closed by the server
    let mut rest = Vec::new();
    let read = tokio::time::timeout(Duration::from_secs(1), stream.read_to_end(&mut rest)).await;
    assert!(matches!(read, Ok(Ok(0)) | Ok(Err(_))));

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_bind_fails_when_port_in_use() {
    let server = start().await;
    let dir = fixture();

    let result = Server::bind(test_config(&dir.path().join("site"), server.addr.port()));
    assert!(matches!(result, Err(ServerError::Bind { .. })));

    server.stop().await;
}

#[tokio::test]
async fn test_bind_fails_for_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let result = Server::bind(test_config(&dir.path().join("nope"), 0));
    assert!(matches!(result, Err(ServerError::Root { .. })));
}

#[tokio::test]
async fn test_banner_and_stop_notice() {
    let server = start().await;
    let addr = server.addr;
    let console = server.console.clone();

    // The banner is written once the server task starts running
    send(addr, "GET", "/hello.txt").await;
    let lines = console.lines();
    assert_eq!(
        lines[0],
        format!("Serving HTTP on 127.0.0.1 port {} (http://{addr}/)", addr.port())
    );
    assert!(lines[1].starts_with("Serving files from: "));
    assert!(!lines.iter().any(|l| l == "Server stopped"));

    server.stop().await;
    assert_eq!(console.lines().last().map(String::as_str), Some("Server stopped"));
}
