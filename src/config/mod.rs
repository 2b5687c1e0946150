// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    BrowserConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    ServingConfig,
};

impl Config {
    /// Load configuration from `devserve.toml` in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("devserve")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; built-in defaults cover every key, and
    /// environment variables override file values. `__` separates nested
    /// keys, e.g. `DEVSERVE_SERVER__PORT=9001`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DEVSERVE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("serving.root", ".")?
            .set_default(
                "serving.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("serving.directory_listing", true)?
            .set_default("browser.open", true)?
            .set_default("browser.startup_delay_ms", 2000)?
            .set_default("http.server_name", "devserve/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_config_file() {
        let cfg = Config::load_from("devserve-missing-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.serving.root, ".");
        assert_eq!(cfg.serving.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.serving.directory_listing);
        assert!(cfg.browser.open);
        assert_eq!(cfg.browser.startup_delay_ms, 2000);
        assert!(!cfg.http.enable_cors);
        assert_eq!(cfg.performance.max_connections, None);
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn environment_variables_override_nested_keys() {
        // read_timeout is not asserted by the defaults test, so this stays
        // safe under parallel test execution
        std::env::set_var("DEVSERVE_PERFORMANCE__READ_TIMEOUT", "45");
        let cfg = Config::load_from("devserve-missing-config").unwrap();
        std::env::remove_var("DEVSERVE_PERFORMANCE__READ_TIMEOUT");
        assert_eq!(cfg.performance.read_timeout, 45);
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load_from("devserve-missing-config").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
    }
}
