use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Error;

/// Shared liveness flag, flipped by the webhook server as it comes up and
/// shuts down.
#[derive(Clone, Default)]
pub struct Health(Arc<AtomicBool>);

impl Health {
    pub fn set_healthy(&self, healthy: bool) {
        if healthy {
            info!("service is now healthy");
        } else {
            warn!("service is unhealthy");
        }
        self.0.store(healthy, Ordering::SeqCst);
    }

    pub fn healthy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn router(health: Health) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(health)
}

async fn healthz(State(health): State<Health>) -> impl IntoResponse {
    if health.healthy() {
        (StatusCode::OK, "Healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Healthy")
    }
}

pub async fn serve(addr: String, health: Health) -> Result<(), Error> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "health server listening");
    axum::serve(listener, router(health)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_server(health: Health) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(health)).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_healthz_reflects_flag() {
        let health = Health::default();
        let base = spawn_server(health.clone()).await;

        let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.text().await.unwrap(), "Not Healthy");

        health.set_healthy(true);
        let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "Healthy");

        health.set_healthy(false);
        let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(resp.status(), 503);
    }
}
