use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the criteria service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let body_limit_bytes = match env::var("APP_BODY_LIMIT_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidBodyLimit { value: raw })?,
            Err(_) => DEFAULT_BODY_LIMIT_BYTES,
        };

        let log_level = var_or("APP_LOG_LEVEL", "info");

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                body_limit_bytes,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings controlling the HTTP server binding and request size.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted tender or bid payload.
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBodyLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBodyLimit { value } => write!(
                f,
                "APP_BODY_LIMIT_BYTES must be a positive byte count, found '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidBodyLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_BODY_LIMIT_BYTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_zero_body_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_BODY_LIMIT_BYTES", "0");
        let err = AppConfig::load().expect_err("zero limit rejected");
        assert!(matches!(err, ConfigError::InvalidBodyLimit { .. }));
        reset_env();
    }

    #[test]
    fn production_aliases_are_recognised() {
        assert_eq!(AppEnvironment::parse(" PROD "), AppEnvironment::Production);
        assert_eq!(AppEnvironment::parse("ci"), AppEnvironment::Test);
        assert_eq!(AppEnvironment::parse("staging"), AppEnvironment::Development);
    }
}
