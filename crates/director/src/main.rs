//! Pod Director - control surface keeping pod records in sync with
//! cluster Deployments
//!
//! The server exposes the record CRUD and cluster reconciliation
//! operations over HTTP, backed by a kube client for the cluster side
//! and the in-memory repository for record storage.

use anyhow::Result;
use director_lib::api::{self, AppState};
use director_lib::cluster::KubeDeployments;
use director_lib::health::{components, HealthRegistry};
use director_lib::observability::DirectorMetrics;
use director_lib::repository::MemoryRepository;
use director_lib::service::PodService;
use kube::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting pod-director");

    let config = config::DirectorConfig::load()?;

    // The kube client is constructed once here and injected; nothing
    // else in the process holds an ambient cluster handle.
    let kube_client = Client::try_default().await?;
    let cluster = Arc::new(KubeDeployments::new(kube_client));
    let repository = Arc::new(MemoryRepository::new());

    let metrics = DirectorMetrics::new();
    let service = Arc::new(PodService::new(repository, cluster, metrics));

    let health_registry = HealthRegistry::new();
    health_registry.register(components::REPOSITORY).await;
    health_registry.register(components::CLUSTER_CLIENT).await;
    health_registry.register(components::API).await;
    health_registry.set_ready(true).await;

    let state = Arc::new(AppState::new(service, health_registry));

    tokio::select! {
        result = api::serve(config.api_port, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("SIGINT received, shutting down"),
    }

    Ok(())
}
