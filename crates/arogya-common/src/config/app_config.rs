//! Process configuration
//!
//! Everything comes from environment variables, optionally seeded from a
//! `.env` file. `API_PORT` and `JWT_SECRET` are required; every other
//! variable has a default.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use arogya_core::entities::DEFAULT_VALIDITY_WINDOW_SECS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub jwt: JwtConfig,
    pub credentials: CredentialConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Load the demo patients, doctors, and appointments at startup
    pub seed_demo_data: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "arogya".to_string(),
            env: Environment::Development,
            seed_demo_data: true,
        }
    }
}

/// Deployment stage, read from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("development") || raw.eq_ignore_ascii_case("dev") {
            Ok(Self::Development)
        } else if raw.eq_ignore_ascii_case("staging") {
            Ok(Self::Staging)
        } else if raw.eq_ignore_ascii_case("production") || raw.eq_ignore_ascii_case("prod") {
            Ok(Self::Production)
        } else {
            Err(ConfigError::InvalidValue("APP_ENV", raw.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for `TcpListener::bind`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session token settings, lifetimes in seconds
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    const MIN_SECRET_LEN: usize = 16;
    const MAX_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

    fn with_secret(secret: String) -> Self {
        Self {
            secret,
            access_token_expiry: 15 * 60,
            refresh_token_expiry: 7 * 24 * 60 * 60,
        }
    }
}

/// Ephemeral credential settings
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// Validity window in seconds
    pub ttl_secs: i64,
    /// Retire a credential once the booked doctor has written a report with it
    pub single_use: bool,
    /// Buffered notifications per subscriber before the slowest one lags
    pub event_capacity: usize,
}

impl CredentialConfig {
    /// Longest validity window accepted
    pub const MAX_TTL_SECS: i64 = 24 * 60 * 60;
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_VALIDITY_WINDOW_SECS,
            single_use: false,
            event_capacity: 256,
        }
    }
}

/// Global token bucket in front of the API routes
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst: 50,
        }
    }
}

/// Browser origins allowed to call the API; empty means "decide by environment"
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Typed reads over a variable lookup
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.raw(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.raw(name)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|_| ConfigError::InvalidValue(name, raw.clone()))
            })
            .transpose()
    }

    fn parsed_or<T: FromStr>(&self, name: &'static str, fallback: T) -> Result<T, ConfigError> {
        Ok(self.parsed(name)?.unwrap_or(fallback))
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.raw(name)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load from the process environment after reading `.env` if present
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or any value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an explicit set of variables
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`]
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let app_defaults = AppSettings::default();
        let credential_defaults = CredentialConfig::default();
        let rate_defaults = RateLimitConfig::default();

        let port = vars
            .parsed("API_PORT")?
            .ok_or(ConfigError::MissingVar("API_PORT"))?;
        let mut jwt = JwtConfig::with_secret(vars.required("JWT_SECRET")?);
        jwt.access_token_expiry = vars.parsed_or("JWT_ACCESS_TOKEN_EXPIRY", jwt.access_token_expiry)?;
        jwt.refresh_token_expiry = vars.parsed_or("JWT_REFRESH_TOKEN_EXPIRY", jwt.refresh_token_expiry)?;

        let config = Self {
            app: AppSettings {
                name: vars.raw("APP_NAME").unwrap_or(app_defaults.name),
                env: vars.parsed_or("APP_ENV", app_defaults.env)?,
                seed_demo_data: vars.parsed_or("SEED_DEMO_DATA", app_defaults.seed_demo_data)?,
            },
            api: ServerConfig {
                host: vars.raw("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port,
            },
            jwt,
            credentials: CredentialConfig {
                ttl_secs: vars.parsed_or("CREDENTIAL_TTL_SECS", credential_defaults.ttl_secs)?,
                single_use: vars.parsed_or("CREDENTIAL_SINGLE_USE", credential_defaults.single_use)?,
                event_capacity: vars
                    .parsed_or("CREDENTIAL_EVENT_CAPACITY", credential_defaults.event_capacity)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", rate_defaults.requests_per_second)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", rate_defaults.burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars.list("CORS_ALLOWED_ORIGINS"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Every optional value at its default
    ///
    /// Used by tests and embedded setups that do not read the environment.
    #[must_use]
    pub fn with_defaults(port: u16, jwt_secret: impl Into<String>) -> Self {
        Self {
            app: AppSettings::default(),
            api: ServerConfig {
                host: "127.0.0.1".to_string(),
                port,
            },
            jwt: JwtConfig::with_secret(jwt_secret.into()),
            credentials: CredentialConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }

    /// Range and cross-field checks
    ///
    /// # Errors
    /// Returns an error naming the first offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &'static str, why: &str| Err(ConfigError::InvalidValue(name, why.to_string()));

        if self.credentials.ttl_secs <= 0 {
            return invalid("CREDENTIAL_TTL_SECS", "must be positive");
        }
        if self.credentials.ttl_secs > CredentialConfig::MAX_TTL_SECS {
            return invalid("CREDENTIAL_TTL_SECS", "must be at most 86400");
        }
        if self.credentials.event_capacity == 0 {
            return invalid("CREDENTIAL_EVENT_CAPACITY", "must be positive");
        }
        if self.jwt.secret.len() < JwtConfig::MIN_SECRET_LEN {
            return invalid("JWT_SECRET", "must be at least 16 characters");
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return invalid("JWT_ACCESS_TOKEN_EXPIRY", "token lifetimes must be positive");
        }
        if self.jwt.access_token_expiry.max(self.jwt.refresh_token_expiry) > JwtConfig::MAX_LIFETIME_SECS {
            return invalid("JWT_REFRESH_TOKEN_EXPIRY", "token lifetimes must be at most a year");
        }
        if self.rate_limit.requests_per_second == 0 {
            return invalid("RATE_LIMIT_REQUESTS_PER_SECOND", "must be positive");
        }
        if self.rate_limit.burst == 0 {
            return invalid("RATE_LIMIT_BURST", "must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    MissingVar(&'static str),

    #[error("{0} has an unusable value: {1}")]
    InvalidValue(&'static str, String),
}
