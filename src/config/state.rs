// Application state module

use std::path::PathBuf;

use super::types::Config;

/// Shared application state.
///
/// Configuration is immutable for the lifetime of the process. The serving
/// root is canonicalized once at startup so per-request traversal checks
/// compare against a stable prefix.
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}
