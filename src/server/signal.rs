// Signal handling module
//
// SIGTERM and SIGINT both trigger graceful shutdown. There is no reload
// signal; restarting the binary is the reload story for a dev server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown coordination shared between the signal task, the accept loop
/// and the foreground task.
pub struct SignalHandler {
    /// Notified once when a shutdown signal arrives
    pub shutdown: Arc<Notify>,
    /// Set before `shutdown` fires; late checks use it to skip work
    /// (e.g. opening a browser tab after Ctrl+C landed mid-delay)
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal listener task (Unix).
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop (Ctrl+C) |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_signal("SIGTERM"),
            _ = sigint.recv() => logger::log_signal("SIGINT (Ctrl+C)"),
        }

        handler.shutdown_requested.store(true, Ordering::SeqCst);
        handler.shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_signal("Ctrl+C");
            handler.shutdown_requested.store(true, Ordering::SeqCst);
            handler.shutdown.notify_one();
        }
    });
}
