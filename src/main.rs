use std::env;
use std::sync::Arc;

use tokio::{signal, task::JoinSet};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod core;
mod error;
mod health;
mod providers;
mod webhook;

use config::Config;
use health::Health;
use providers::bunny::{BunnyClient, BunnyProvider, Options};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;

    let client = BunnyClient::new(config.api_url.clone(), config.api_key.clone())?;
    let provider = Arc::new(BunnyProvider::new(Arc::new(client), Options::from(&config)).await?);
    let health = Health::default();

    let mut pool = JoinSet::new();

    // Liveness probe on its own listener.
    {
        let health = health.clone();
        let addr = config.health_addr();
        pool.spawn(async move {
            if let Err(e) = health::serve(addr, health).await {
                error!(error = %e, "health server failed");
            }
        });
    }

    // The external-dns webhook surface.
    {
        let health = health.clone();
        let addr = config.webhook_addr();
        pool.spawn(async move {
            if let Err(e) = webhook::serve(addr, provider, health).await {
                error!(error = %e, "webhook server failed");
            }
        });
    }

    info!("starting external-dns-bunny-webhook");

    // Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("shutdown signal received");
            pool.shutdown().await;
        }
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }

    Ok(())
}

fn init_logging() {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
