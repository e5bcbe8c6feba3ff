//! Configuration module entry point
//! Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Prefix for environment overrides, e.g. `HELLO_SERVER__PORT=9090`
const ENV_PREFIX: &str = "HELLO";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources in increasing priority: built-in defaults, the config file
    /// (optional), then `HELLO_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()
    }

    /// Reject values the runtime would otherwise panic on
    fn validate(self) -> Result<Self, ServerError> {
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            )
            .into());
        }
        Ok(self)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_default_matches_loaded_defaults() {
        let loaded = Config::load_from("does-not-exist/config").unwrap();
        let built = Config::default();
        assert_eq!(loaded.server.port, built.server.port);
        assert_eq!(loaded.server.host, built.server.host);
        assert_eq!(loaded.performance.read_timeout, built.performance.read_timeout);
        assert_eq!(loaded.http.max_body_size, built.http.max_body_size);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_invalid_socket_addr() {
        let mut cfg = Config::default();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::Address { .. })
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut cfg = Config::default();
        cfg.server.workers = Some(0);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
        assert!(err.to_string().contains("server.workers"));

        let mut cfg = Config::default();
        cfg.server.workers = Some(2);
        assert_eq!(cfg.validate().unwrap().server.workers, Some(2));
    }

    #[test]
    fn test_zero_workers_in_file_rejected() {
        let dir = std::env::temp_dir().join(format!("hello-server-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("zero_workers.toml"), "[server]\nworkers = 0\n").unwrap();

        let result = Config::load_from(dir.join("zero_workers").to_str().unwrap());
        assert!(matches!(result, Err(ServerError::Config(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_connection_timeout_uses_larger_value() {
        let mut cfg = Config::default();
        cfg.performance.read_timeout = 5;
        cfg.performance.write_timeout = 12;
        assert_eq!(cfg.performance.connection_timeout().as_secs(), 12);
    }
}
