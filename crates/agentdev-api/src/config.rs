//! API configuration.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::warn;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "AgentDev Platform API";

/// Credentials of the account seeded into the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
            name: "Admin User".to_string(),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Deployment name reported by `GET /` (`dev`, `staging`, ...).
    pub environment: String,
    /// Root of the JSON record store.
    pub data_dir: PathBuf,
    /// Allowed CORS origins. `*` allows any origin without credentials.
    pub cors_origins: Vec<String>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Requests per client per minute; 0 disables the limiter.
    pub rate_limit_per_minute: usize,
    pub max_artifact_bytes: u64,
    pub admin: AdminAccount,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl ApiConfig {
    /// Creates a configuration with the given host and port and defaults elsewhere.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Reads `AGENTDEV_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cors_origins = get("AGENTDEV_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let admin = AdminAccount {
            email: get("AGENTDEV_ADMIN_EMAIL").unwrap_or(defaults.admin.email),
            password: get("AGENTDEV_ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            name: get("AGENTDEV_ADMIN_NAME").unwrap_or(defaults.admin.name),
        };

        Self {
            host: get("AGENTDEV_HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "AGENTDEV_PORT", defaults.port),
            environment: get("AGENTDEV_ENVIRONMENT").unwrap_or(defaults.environment),
            data_dir: get("AGENTDEV_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cors_origins,
            access_token_ttl: Duration::from_secs(parse_or(
                &get,
                "AGENTDEV_ACCESS_TOKEN_TTL_SECS",
                defaults.access_token_ttl.as_secs(),
            )),
            refresh_token_ttl: Duration::from_secs(parse_or(
                &get,
                "AGENTDEV_REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_token_ttl.as_secs(),
            )),
            rate_limit_per_minute: parse_or(
                &get,
                "AGENTDEV_RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            ),
            max_artifact_bytes: parse_or(
                &get,
                "AGENTDEV_MAX_ARTIFACT_BYTES",
                defaults.max_artifact_bytes,
            ),
            admin,
            start_time: defaults.start_time,
        }
    }

    /// Sets the CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_rate_limit(mut self, per_minute: usize) -> Self {
        self.rate_limit_per_minute = per_minute;
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            environment: "dev".to_string(),
            data_dir: default_data_dir(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "https://localhost:3000".to_string(),
            ],
            access_token_ttl: Duration::from_secs(1800),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            rate_limit_per_minute: 100,
            max_artifact_bytes: 100 * 1024 * 1024,
            admin: AdminAccount::default(),
            start_time: Instant::now(),
        }
    }
}

/// `~/.agentdev/data`, or `./.agentdev/data` when there is no home directory.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agentdev")
        .join("data")
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}
