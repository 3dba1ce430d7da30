//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, CredentialConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig,
};
