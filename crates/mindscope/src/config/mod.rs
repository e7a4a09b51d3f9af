use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::assessment::DEFAULT_QUICK_COUNT;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let quick_count = match env::var("MINDSCOPE_QUICK_COUNT") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => return Err(ConfigError::InvalidQuickCount { value: raw }),
            },
            Err(_) => DEFAULT_QUICK_COUNT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentSettings {
                catalog_path: optional_path("MINDSCOPE_CATALOG_PATH"),
                scoring_config_path: optional_path("MINDSCOPE_SCORING_CONFIG"),
                results_cache_path: optional_path("MINDSCOPE_RESULTS_CACHE"),
                quick_count,
            },
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the assessment inputs come from and where results are cached.
///
/// Every path is optional: without a catalog path the bundled catalog is served, without a
/// scoring config the default category table applies, and without a cache path results are
/// only kept in memory.
#[derive(Debug, Clone)]
pub struct AssessmentSettings {
    pub catalog_path: Option<PathBuf>,
    pub scoring_config_path: Option<PathBuf>,
    pub results_cache_path: Option<PathBuf>,
    pub quick_count: usize,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            scoring_config_path: None,
            results_cache_path: None,
            quick_count: DEFAULT_QUICK_COUNT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidQuickCount { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidQuickCount { value } => write!(
                f,
                "MINDSCOPE_QUICK_COUNT must be a positive integer (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidQuickCount { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
