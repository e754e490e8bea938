use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub locations: LocationsConfig,
    pub catalog_path: Option<PathBuf>,
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

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY").ok().filter(|key| !key.is_empty());
        let search_radius_m = env::var("APP_LOCATION_RADIUS_M")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidRadius)?;

        let catalog_path = env::var("APP_CATALOG_PATH").ok().map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            locations: LocationsConfig {
                google_maps_api_key,
                search_radius_m,
            },
            catalog_path,
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

/// Settings for the nearby-location gateway.
#[derive(Debug, Clone)]
pub struct LocationsConfig {
    pub google_maps_api_key: Option<String>,
    pub search_radius_m: u32,
}

impl LocationsConfig {
    /// The key is optional at load time so offline commands can run, but
    /// `serve` requires it before wiring the gateway.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.google_maps_api_key
            .as_deref()
            .ok_or(ConfigError::MissingGoogleApiKey)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidRadius,
    InvalidHost { source: std::net::AddrParseError },
    MissingGoogleApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidRadius => {
                write!(f, "APP_LOCATION_RADIUS_M must be a valid u32 in meters")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingGoogleApiKey => {
                write!(f, "GOOGLE_MAPS_API_KEY must be set to serve location lookups")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
