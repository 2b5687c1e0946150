// Server module entry point
// Provides the listener, the accept loop and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use server_loop::run_accept_loop;
pub use signal::{start_signal_handler, SignalHandler};
