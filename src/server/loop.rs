//! Server loop module
//! Accepts connections until the process is terminated

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections forever, handing each one to its own task.
///
/// Accept errors (e.g. the fd limit is hit) are logged and the loop keeps
/// going.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::demo;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn spawn_server(config: Config) -> std::net::SocketAddr {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config, demo::router().unwrap()));
        tokio::spawn(start_server_loop(listener, state));
        addr
    }

    /// Send one request with `Connection: close` and read the whole reply
    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.logging.access_log = false;
        config
    }

    #[tokio::test]
    async fn test_serves_hello_over_tcp() {
        let addr = spawn_server(quiet_config()).await;
        let reply = roundtrip(
            addr,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"), "got: {reply}");
        assert!(reply.contains("application/json"));
        assert!(reply.ends_with(r#"{"message":"Hello, World!","status":"success"}"#));
    }

    #[tokio::test]
    async fn test_posts_json_over_tcp() {
        let addr = spawn_server(quiet_config()).await;
        let body = r#"{"a":1}"#;
        let request = format!(
            "POST /data HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let reply = roundtrip(addr, &request).await;
        assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"), "got: {reply}");
        assert!(reply.contains(r#""data":{"a":1}"#));
    }

    #[tokio::test]
    async fn test_unknown_path_over_tcp() {
        let addr = spawn_server(quiet_config()).await;
        let reply = roundtrip(
            addr,
            "GET /unknown-path HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(reply.starts_with("HTTP/1.1 404 Not Found\r\n"), "got: {reply}");
    }

    #[tokio::test]
    async fn test_connection_cap_rejects_extra_clients() {
        let mut config = quiet_config();
        config.performance.max_connections = Some(0);
        let addr = spawn_server(config).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let _ = stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut buf = Vec::new();
        // The server drops the socket without answering
        let _ = stream.read_to_end(&mut buf).await;
        assert!(buf.is_empty());
    }
}
