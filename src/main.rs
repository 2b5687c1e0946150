use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod browser;
mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::log_startup();

    let root = validate_serving_root(&cfg)?;
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg, root));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(run_dev_server(listener, state, signals, addr))
        .await
}

/// Run the server as a background worker and drive the foreground sequence:
/// startup delay, browser hand-off, then block until shutdown completes.
async fn run_dev_server(
    listener: tokio::net::TcpListener,
    state: Arc<config::AppState>,
    signals: Arc<server::SignalHandler>,
    addr: std::net::SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    let worker = tokio::task::spawn_local(server::run_accept_loop(
        listener,
        Arc::clone(&state),
        Arc::clone(&active_connections),
        Arc::clone(&signals.shutdown),
    ));

    logger::log_server_start(&addr, &state.config, &state.root);

    let url = format!("http://{addr}");
    if state.config.browser.open {
        // Give the listener a moment before pointing a browser at it.
        let delay = Duration::from_millis(state.config.browser.startup_delay_ms);
        tokio::time::sleep(delay).await;

        // Ctrl+C during the startup delay should not still open a tab
        if !signals.shutdown_requested.load(Ordering::SeqCst) {
            browser::open_tab(&url);
        }
    }
    logger::log_running(&url);

    // The worker returns once the shutdown signal fired and in-flight
    // connections drained.
    worker.await?;
    logger::log_stopped();

    Ok(())
}

/// Check the serving root before binding anything.
///
/// Mistyped roots and running from the wrong directory are the common
/// failures here, so the error names the fix.
fn validate_serving_root(cfg: &config::Config) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = PathBuf::from(&cfg.serving.root);
    if !root.is_dir() {
        return Err(format!(
            "Serving root '{}' is not a directory. Run devserve from your project directory or set serving.root",
            root.display()
        )
        .into());
    }

    if !cfg
        .serving
        .index_files
        .iter()
        .any(|f| root.join(f).is_file())
    {
        logger::log_warning(&format!(
            "No index file found in '{}'; the root path will show a directory listing",
            root.display()
        ));
    }

    Ok(root.canonicalize()?)
}
