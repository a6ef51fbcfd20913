use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::catalog::TypeMatchPolicy;

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
    pub store: StoreConfig,
    pub pricing: PricingConfig,
    pub catalog: CatalogConfig,
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

        let backend = StoreBackend::parse(
            &env::var("APP_QUOTE_STORE").unwrap_or_else(|_| "memory".to_string()),
        )?;
        let path = env::var("APP_QUOTE_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let table_path = non_empty_var("APP_PRICING_TABLE").map(PathBuf::from);
        let directory = non_empty_var("APP_CATALOG_DIR").map(PathBuf::from);
        let type_match = parse_type_match(
            &env::var("APP_CATALOG_TYPE_MATCH").unwrap_or_else(|_| "includes".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store: StoreConfig { backend, path },
            pricing: PricingConfig { table_path },
            catalog: CatalogConfig {
                directory,
                type_match,
            },
        })
    }
}

const DEFAULT_STORE_PATH: &str = "insurance_quotes.json";

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_type_match(value: &str) -> Result<TypeMatchPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "includes" | "include" | "any" => Ok(TypeMatchPolicy::Includes),
        "exclusive" | "exact" => Ok(TypeMatchPolicy::Exclusive),
        _ => Err(ConfigError::InvalidTypeMatch(value.to_string())),
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

/// Where saved quotes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            _ => Err(ConfigError::InvalidStoreBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

/// Optional override for the canonical pricing table.
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub table_path: Option<PathBuf>,
}

/// Optional CSV catalog directory and the type matching policy applied to it.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub directory: Option<PathBuf>,
    pub type_match: TypeMatchPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStoreBackend(String),
    InvalidTypeMatch(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStoreBackend(value) => {
                write!(f, "APP_QUOTE_STORE must be 'memory' or 'file', found '{value}'")
            }
            ConfigError::InvalidTypeMatch(value) => write!(
                f,
                "APP_CATALOG_TYPE_MATCH must be 'includes' or 'exclusive', found '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStoreBackend(_)
            | ConfigError::InvalidTypeMatch(_) => None,
        }
    }
}
