// Connection handling module
// Accepts and serves a single TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, enforcing the optional connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection in a spawned task.
///
/// Wraps the stream in `TokioIo`, configures HTTP/1.1 keep-alive, applies an
/// overall timeout, and decrements the connection counter when done.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        // hyper defaults keep-alive to on; set it unconditionally so a
        // zero timeout can disable it
        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection timeout after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        // Decrement active connection counter
        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;

    /// Serve one request through `accept_connection` with the given
    /// keep-alive timeout and return the response.
    async fn request_root(keep_alive_timeout: u64) -> hyper::Response<hyper::body::Incoming> {
        let mut cfg = Config::load_from("devserve-missing-config").unwrap();
        cfg.performance.keep_alive_timeout = keep_alive_timeout;
        cfg.logging.access_log = false;

        let root = std::env::temp_dir().canonicalize().unwrap();
        let state = Arc::new(AppState::new(cfg, root));
        let conn_counter = Arc::new(AtomicUsize::new(0));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::task::spawn_local(async move {
            if let Ok((stream, peer_addr)) = listener.accept().await {
                accept_connection(stream, peer_addr, &state, &conn_counter);
            }
        });

        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::task::spawn_local(async move {
            let _ = conn.await;
        });

        let req = hyper::Request::builder()
            .uri("/")
            .header("Host", "localhost")
            .body(Empty::<Bytes>::new())
            .unwrap();
        sender.send_request(req).await.unwrap()
    }

    #[tokio::test]
    async fn zero_keep_alive_timeout_closes_the_connection() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let resp = request_root(0).await;
                assert_eq!(
                    resp.headers()
                        .get("connection")
                        .and_then(|v| v.to_str().ok()),
                    Some("close")
                );
                let _ = resp.into_body().collect().await;
            })
            .await;
    }

    #[tokio::test]
    async fn default_keep_alive_leaves_the_connection_open() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let resp = request_root(75).await;
                assert!(resp.headers().get("connection").is_none());
                let _ = resp.into_body().collect().await;
            })
            .await;
    }
}
