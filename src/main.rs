//! Fixi hook host
//!
//! Boots a hook registry from configuration, installs the built-in error
//! reporter, and runs the `startup` and `shutdown` hooks.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use fixi_core::config::FixiConfig;
use fixi_core::error::AppError;
use fixi_hooks::{ErrorReporter, HookEvent, HookRegistry};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Hook host error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<FixiConfig, AppError> {
    let env = std::env::var("FIXI_ENV").unwrap_or_else(|_| "development".to_string());
    FixiConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &FixiConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: FixiConfig) -> Result<(), AppError> {
    tracing::info!("Starting Fixi hooks v{}", env!("CARGO_PKG_VERSION"));

    let registry = HookRegistry::from_config(&config.hooks);

    let reporter = Arc::new(ErrorReporter::new(config.hooks.error_history));
    reporter.install(&registry).await;

    let startup = HookEvent::new().with_string("version", env!("CARGO_PKG_VERSION"));
    let startup = registry.dispatch("startup", startup).await;
    tracing::info!(event = %serde_json::to_string(&startup)?, "Startup hook complete");

    tracing::info!(
        hooks = ?registry.registered_hooks().await,
        disabled = ?registry.disabled_plugins().await,
        "Registry ready"
    );

    registry.dispatch_default("shutdown").await;

    let failures = reporter.count().await;
    if failures > 0 {
        tracing::warn!(failures = failures, "Plugin handlers failed during run");
    }

    for name in registry.plugins().await.into_keys() {
        registry.unregister_plugin(&name).await;
    }

    tracing::info!("Fixi hooks stopped");
    Ok(())
}
