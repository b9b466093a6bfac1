//! kube-rs backed Deployment access

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, DeleteParams, PostParams};
use kube::Client;
use tracing::debug;

use super::DeploymentApi;

/// Deployment access through a shared kube client.
///
/// The client is injected at construction; no ambient global handle is
/// involved, so independent instances can coexist in one process.
pub struct KubeDeployments {
    client: Client,
}

impl KubeDeployments {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl DeploymentApi for KubeDeployments {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        debug!(namespace = %namespace, name = %name, "Fetching deployment");
        self.deployments(namespace)
            .get_opt(name)
            .await
            .with_context(|| format!("failed to get deployment {}/{}", namespace, name))
    }

    async fn create(&self, namespace: &str, deployment: &Deployment) -> Result<()> {
        self.deployments(namespace)
            .create(&PostParams::default(), deployment)
            .await
            .with_context(|| format!("failed to create deployment in {}", namespace))?;
        Ok(())
    }

    async fn update(&self, namespace: &str, deployment: &Deployment) -> Result<()> {
        let name = deployment
            .metadata
            .name
            .as_deref()
            .context("deployment has no name")?;
        self.deployments(namespace)
            .replace(name, &PostParams::default(), deployment)
            .await
            .with_context(|| format!("failed to replace deployment {}/{}", namespace, name))?;
        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        self.deployments(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .with_context(|| format!("failed to delete deployment {}/{}", namespace, name))?;
        Ok(())
    }
}
