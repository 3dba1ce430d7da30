//! Arogya API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p arogya-api
//! ```
//!
//! Configuration is read from the environment, with an optional `.env` file.

use arogya_common::{init_tracing, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // APP_ENV picks the log format before the rest of the config is parsed
    let env = std::env::var("APP_ENV")
        .ok()
        .and_then(|raw| raw.parse::<Environment>().ok())
        .unwrap_or(Environment::Development);
    if let Err(e) = init_tracing(&TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Arogya API server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        credential_ttl_secs = config.credentials.ttl_secs,
        single_use = config.credentials.single_use,
        "Configuration loaded"
    );

    arogya_api::run(config).await?;

    Ok(())
}
