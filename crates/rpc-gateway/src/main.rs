//! Gateway client entry point
//!
//! Run with:
//! ```bash
//! GATEWAY_TOKEN=... cargo run -p rpc-gateway
//! ```
//!
//! Connects, publishes the configured presence and keeps the session alive
//! until Ctrl-C.

use rpc_common::{
    try_init_tracing_with_config, AppConfig, AppError, AppResult, ConfigError, TracingConfig,
};
use rpc_gateway::{GatewayConnection, Presence};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration is read first so APP_ENV can pick the log format
    let config = AppConfig::from_env();
    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Gateway client failed");
        std::process::exit(e.exit_code());
    }
}

async fn run(config: Result<AppConfig, ConfigError>) -> AppResult<()> {
    let config = config.inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        url = %config.gateway.url,
        "Configuration loaded"
    );

    let presence = Presence::from(&config.presence);
    let gateway = GatewayConnection::new(config.gateway);
    gateway.connect().await.map_err(AppError::gateway)?;

    let result = tokio::select! {
        published = gateway.send_activity(&presence) => match published {
            Ok(()) => {
                info!("Presence published, press Ctrl-C to exit");
                tokio::signal::ctrl_c().await.map_err(AppError::internal)
            }
            Err(e) => Err(AppError::gateway(e)),
        },
        signal = tokio::signal::ctrl_c() => {
            info!("Interrupted before the session was ready");
            signal.map_err(AppError::internal)
        }
    };

    info!("Shutting down");
    gateway.close().await;
    result
}
