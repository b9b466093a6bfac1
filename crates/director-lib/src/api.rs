//! HTTP control API
//!
//! Exposes the pod record CRUD and the cluster reconciliation
//! operations, plus health checks and Prometheus metrics. Service
//! failures cross the boundary as their stable (code, message, status)
//! triple.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::health::{ComponentStatus, HealthRegistry};
use crate::models::{PodRecord, PodSpec};
use crate::repository::RepositoryError;
use crate::service::{PodService, ServiceError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PodService>,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(service: Arc<PodService>, health_registry: HealthRegistry) -> Self {
        Self {
            service,
            health_registry,
        }
    }
}

/// Wire form of a service failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub error: String,
    pub status: u32,
}

/// Response to a record insert
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

fn error_response(err: ServiceError) -> Response {
    let http_status = match &err {
        ServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::ClusterCallFailed { .. } => StatusCode::BAD_GATEWAY,
        ServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        code: err.code().to_string(),
        error: err.to_string(),
        status: err.status(),
    };
    (http_status, Json(body)).into_response()
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

async fn list_pods(State(state): State<Arc<AppState>>) -> Response {
    match state.service.find_all().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn add_pod(State(state): State<Arc<AppState>>, Json(spec): Json<PodSpec>) -> Response {
    match state.service.add_record(spec).await {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_pod(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.service.find_by_id(id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_pod(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(spec): Json<PodSpec>,
) -> Response {
    let record = PodRecord::new(id, spec);
    match state.service.update_record(&record).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn remove_pod(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.service.delete_record(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_deployment(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<PodSpec>,
) -> Response {
    match state.service.create_to_cluster(&spec).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_deployment(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<PodSpec>,
) -> Response {
    match state.service.update_in_cluster(&spec).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Delete the cluster deployment tracked by a record, then the record.
async fn delete_deployment(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let record = match state.service.find_by_id(id).await {
        Ok(record) => record,
        Err(err) => return error_response(err),
    };
    match state.service.delete_from_cluster(&record).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/pods", get(list_pods).post(add_pod))
        .route(
            "/api/v1/pods/:id",
            get(get_pod).put(update_pod).delete(remove_pod),
        )
        .route("/api/v1/pods/:id/deployment", delete(delete_deployment))
        .route(
            "/api/v1/deployments",
            post(create_deployment).put(update_deployment),
        )
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting control API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
