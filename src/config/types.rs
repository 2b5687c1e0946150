// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub serving: ServingConfig,
    pub browser: BrowserConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// What to serve and how directory requests resolve
#[derive(Debug, Deserialize, Clone)]
pub struct ServingConfig {
    /// Directory served over HTTP
    pub root: String,
    /// Files tried, in order, when a directory path is requested
    pub index_files: Vec<String>,
    /// Render an HTML listing when a directory has no index file
    pub directory_listing: bool,
}

/// Browser hand-off after startup
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Open the default browser once the server is up
    pub open: bool,
    /// Delay before opening, giving the listener time to come up
    pub startup_delay_ms: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    pub show_headers: bool,
}
