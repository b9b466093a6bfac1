//! Core library for the pod director control surface
//!
//! This crate provides the core functionality for:
//! - Translating domain pod specifications into Deployment resources
//! - Reconciling pod specifications against a live cluster
//! - Tracking pod records through a pluggable repository
//! - The HTTP control API
//! - Health checks and observability

pub mod api;
pub mod cluster;
pub mod health;
pub mod mapper;
pub mod models;
pub mod observability;
pub mod repository;
pub mod service;

pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::DirectorMetrics;
pub use service::{PodService, ServiceError};
