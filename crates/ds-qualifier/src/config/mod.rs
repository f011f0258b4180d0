use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Catalog ceiling of the reference questionnaire.
pub const DEFAULT_MAX_SCORE: u32 = 21;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3_600;
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

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
    pub catalog: CatalogConfig,
    pub sessions: SessionConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig::from_env()?,
            sessions: SessionConfig::from_env()?,
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

/// Where the question and profile catalogs come from.
///
/// Unset paths select the built-in reference catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub questions_csv: Option<PathBuf>,
    pub profiles_json: Option<PathBuf>,
    pub max_score: u32,
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_score = match env::var("DSQ_MAX_SCORE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidMaxScore { value: raw })?,
            Err(_) => DEFAULT_MAX_SCORE,
        };

        Ok(Self {
            questions_csv: optional_path("DSQ_QUESTIONS_CSV"),
            profiles_json: optional_path("DSQ_PROFILES_JSON"),
            max_score,
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            questions_csv: None,
            profiles_json: None,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

/// Bounds on the in-memory snapshot slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Slots whose submission is older than this are dropped.
    pub ttl_secs: u64,
    /// Most slots held at once; the oldest submission is evicted first.
    pub capacity: usize,
}

impl SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ttl_secs: positive_setting("DSQ_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            capacity: positive_setting("DSQ_SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)?,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}

fn positive_setting<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .filter(|value| *value > T::default())
            .ok_or(ConfigError::InvalidSessionSetting { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMaxScore { value: String },
    InvalidSessionSetting { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxScore { value } => {
                write!(f, "DSQ_MAX_SCORE must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidSessionSetting { key, value } => {
                write!(f, "{key} must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidMaxScore { .. }
            | ConfigError::InvalidSessionSetting { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
