//! Cluster client facade
//!
//! The reconciliation service talks to the orchestrator exclusively
//! through the [`DeploymentApi`] trait so it can be exercised against a
//! substitute implementation instead of a live cluster. The kube-backed
//! implementation lives in [`kube`].

mod kube;

pub use self::kube::KubeDeployments;

use anyhow::Result;
use k8s_openapi::api::apps::v1::Deployment;

pub use async_trait::async_trait;

/// Namespaced access to Deployment workload resources.
///
/// Calls are synchronous per invocation and carry no retry or timeout
/// policy of their own; caller cancellation propagates through the
/// returned futures.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Fetch the Deployment with the given name, or `None` if the
    /// cluster has no such resource.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;

    /// Create the Deployment in the given namespace.
    async fn create(&self, namespace: &str, deployment: &Deployment) -> Result<()>;

    /// Replace the existing Deployment with the given one in full.
    async fn update(&self, namespace: &str, deployment: &Deployment) -> Result<()>;

    /// Delete the Deployment with the given name.
    async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}
