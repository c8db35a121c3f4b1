use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::schemes::domain::DisabilityLabels;
use crate::schemes::eligibility::EligibilityStrategy;

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
    pub dataset: DatasetConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let path = env::var("APP_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/schemes.json"));
        let saved_store_path = env::var("APP_SAVED_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/saved_schemes.json"));

        let labels = env::var("APP_DISABILITY_LABELS").unwrap_or_else(|_| "profound".to_string());
        let disability_labels = DisabilityLabels::from_name(&labels)
            .ok_or(ConfigError::InvalidDisabilityLabels { value: labels })?;

        let strategy = env::var("APP_ELIGIBILITY_STRATEGY").unwrap_or_else(|_| "strict".to_string());
        let strategy = EligibilityStrategy::from_name(&strategy)
            .ok_or(ConfigError::InvalidStrategy { value: strategy })?;

        let filter_cache_capacity = env::var("APP_FILTER_CACHE_CAPACITY")
            .unwrap_or_else(|_| "128".to_string())
            .trim()
            .parse::<usize>()
            .map_err(|source| ConfigError::InvalidCacheCapacity { source })?;

        let classifier_rules_path = env::var("APP_CLASSIFIER_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dataset: DatasetConfig {
                path,
                saved_store_path,
                disability_labels,
            },
            matching: MatchingConfig {
                strategy,
                filter_cache_capacity,
                classifier_rules_path,
            },
        })
    }
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

/// Where the scheme catalog and the local saved-schemes fallback live.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub saved_store_path: PathBuf,
    pub disability_labels: DisabilityLabels,
}

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub strategy: EligibilityStrategy,
    /// Zero disables filter memoization.
    pub filter_cache_capacity: usize,
    /// Keyword rules replacing the built-in classifier vocabulary.
    pub classifier_rules_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStrategy { value: String },
    InvalidDisabilityLabels { value: String },
    InvalidCacheCapacity { source: std::num::ParseIntError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStrategy { value } => write!(
                f,
                "APP_ELIGIBILITY_STRATEGY must be 'strict' or 'scored', found '{value}'"
            ),
            ConfigError::InvalidDisabilityLabels { value } => write!(
                f,
                "APP_DISABILITY_LABELS must be 'profound' or 'very_severe', found '{value}'"
            ),
            ConfigError::InvalidCacheCapacity { .. } => {
                write!(f, "APP_FILTER_CACHE_CAPACITY must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidStrategy { .. }
            | ConfigError::InvalidDisabilityLabels { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidCacheCapacity { source } => Some(source),
        }
    }
}
