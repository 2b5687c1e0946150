// Server accept loop module
// Accepts connections until the shutdown signal fires, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
const DRAIN_WINDOW: Duration = Duration::from_secs(3);

/// Accept connections until `shutdown` is notified.
///
/// Runs as a background task; the foreground task awaits its join handle,
/// which blocks until teardown is complete.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown_requested();
                break;
            }
        }
    }

    // Stop accepting immediately, then give in-flight requests a bounded
    // window to complete before the process exits.
    drop(listener);
    drain_connections(&active_connections).await;
}

/// Wait for the active connection counter to reach zero, up to `DRAIN_WINDOW`.
async fn drain_connections(active_connections: &AtomicUsize) {
    let open = active_connections.load(Ordering::SeqCst);
    if open == 0 {
        return;
    }
    logger::log_draining(open);

    let deadline = tokio::time::Instant::now() + DRAIN_WINDOW;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            let remaining = active_connections.load(Ordering::SeqCst);
            logger::log_warning(&format!(
                "{remaining} connection(s) still open after drain window, closing anyway"
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
