//! Pod reconciliation service
//!
//! The orchestrating component of the crate: consumes the resource
//! mapper, the cluster client facade, and the pod repository to keep a
//! single Deployment per pod record synchronized with caller intent.
//! Reconciliation is request-driven; nothing here runs in the
//! background, and no call is ever retried internally.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::cluster::DeploymentApi;
use crate::mapper;
use crate::models::{PodRecord, PodSpec};
use crate::observability::DirectorMetrics;
use crate::repository::{PodRepository, RepositoryError};

#[cfg(test)]
mod tests;

/// Errors surfaced to callers of [`PodService`].
///
/// Each variant carries a stable wire triple (code, message, status) so
/// transports can hand failures to remote callers unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Cluster create attempted against an existing resource.
    #[error("pod {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    /// Cluster update attempted against a resource absent from the cluster.
    #[error("pod {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// A transport or API failure from the orchestrator client, wrapped
    /// with the operation and resource identity it happened on.
    #[error("cluster {operation} failed for {namespace}/{name}: {source}")]
    ClusterCallFailed {
        operation: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A persistence-layer failure.
    #[error("repository call failed: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    fn cluster(operation: &'static str, namespace: &str, name: &str, source: anyhow::Error) -> Self {
        Self::ClusterCallFailed {
            operation,
            namespace: namespace.to_string(),
            name: name.to_string(),
            source: source.into(),
        }
    }

    /// Short wire code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "1",
            Self::NotFound { .. } => "2",
            Self::ClusterCallFailed { .. } => "3",
            Self::Repository(_) => "4",
        }
    }

    /// Numeric wire status for the error kind.
    pub fn status(&self) -> u32 {
        match self {
            Self::AlreadyExists { .. } => 1003,
            Self::NotFound { .. } => 1004,
            Self::ClusterCallFailed { .. } => 1005,
            Self::Repository(_) => 1006,
        }
    }
}

/// Request-driven reconciliation of pod records against the cluster.
///
/// Both collaborators are injected at construction. Concurrent callers
/// operating on the same (namespace, name) are not serialized here; two
/// racing creates can both pass the existence check and the loser
/// surfaces the transport conflict.
pub struct PodService {
    repository: Arc<dyn PodRepository>,
    cluster: Arc<dyn DeploymentApi>,
    metrics: DirectorMetrics,
}

impl PodService {
    pub fn new(
        repository: Arc<dyn PodRepository>,
        cluster: Arc<dyn DeploymentApi>,
        metrics: DirectorMetrics,
    ) -> Self {
        Self {
            repository,
            cluster,
            metrics,
        }
    }

    fn finish_call(&self, operation: &str, started: Instant, ok: bool) {
        self.metrics
            .observe_cluster_call(operation, started.elapsed().as_secs_f64());
        if !ok {
            self.metrics.inc_cluster_call_errors();
        }
    }

    async fn existing_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<bool, ServiceError> {
        let started = Instant::now();
        let result = self.cluster.get(namespace, name).await;
        self.finish_call("get", started, result.is_ok());
        result
            .map(|found| found.is_some())
            .map_err(|e| ServiceError::cluster("get", namespace, name, e))
    }

    /// Create the Deployment for `spec` in the cluster.
    ///
    /// Fails with [`ServiceError::AlreadyExists`] without mutating
    /// anything when the cluster already holds a resource under the same
    /// (namespace, name). The persistent record is the caller's
    /// business; this call only touches the cluster.
    pub async fn create_to_cluster(&self, spec: &PodSpec) -> Result<(), ServiceError> {
        let deployment = mapper::build_deployment(spec);

        if self.existing_deployment(&spec.namespace, &spec.name).await? {
            warn!(
                name = %spec.name,
                namespace = %spec.namespace,
                "Refusing to create deployment that already exists"
            );
            return Err(ServiceError::AlreadyExists {
                namespace: spec.namespace.clone(),
                name: spec.name.clone(),
            });
        }

        let started = Instant::now();
        let result = self.cluster.create(&spec.namespace, &deployment).await;
        self.finish_call("create", started, result.is_ok());
        result.map_err(|e| ServiceError::cluster("create", &spec.namespace, &spec.name, e))?;

        self.metrics.inc_deployments_created();
        info!(
            name = %spec.name,
            namespace = %spec.namespace,
            replicas = spec.replicas,
            "Created deployment"
        );
        Ok(())
    }

    /// Replace the cluster Deployment for `spec` in full.
    ///
    /// The resource is rebuilt from the spec and overwrites the entire
    /// remote spec; concurrent external edits are clobbered. Fails with
    /// [`ServiceError::NotFound`] without mutating anything when the
    /// resource is absent.
    pub async fn update_in_cluster(&self, spec: &PodSpec) -> Result<(), ServiceError> {
        let deployment = mapper::build_deployment(spec);

        if !self.existing_deployment(&spec.namespace, &spec.name).await? {
            warn!(
                name = %spec.name,
                namespace = %spec.namespace,
                "Refusing to update deployment that does not exist"
            );
            return Err(ServiceError::NotFound {
                namespace: spec.namespace.clone(),
                name: spec.name.clone(),
            });
        }

        let started = Instant::now();
        let result = self.cluster.update(&spec.namespace, &deployment).await;
        self.finish_call("update", started, result.is_ok());
        result.map_err(|e| ServiceError::cluster("update", &spec.namespace, &spec.name, e))?;

        self.metrics.inc_deployments_updated();
        info!(
            name = %spec.name,
            namespace = %spec.namespace,
            replicas = spec.replicas,
            "Updated deployment"
        );
        Ok(())
    }

    /// Delete the cluster Deployment for `record`, then its record.
    ///
    /// Ordering invariant: cluster delete first, record delete second,
    /// never the reverse. If the cluster delete fails the record is left
    /// untouched. If the record delete fails afterwards, the failure is
    /// surfaced but the cluster deletion stands.
    pub async fn delete_from_cluster(&self, record: &PodRecord) -> Result<(), ServiceError> {
        let spec = &record.spec;

        let started = Instant::now();
        let result = self.cluster.delete(&spec.namespace, &spec.name).await;
        self.finish_call("delete", started, result.is_ok());
        result.map_err(|e| ServiceError::cluster("delete", &spec.namespace, &spec.name, e))?;

        self.metrics.inc_deployments_deleted();
        info!(
            name = %spec.name,
            namespace = %spec.namespace,
            id = record.id,
            "Deleted deployment"
        );

        if let Err(err) = self.repository.delete(record.id).await {
            warn!(
                name = %spec.name,
                id = record.id,
                error = %err,
                "Deployment deleted but record removal failed"
            );
            return Err(ServiceError::Repository(err));
        }
        Ok(())
    }

    /// Insert a pod record, returning its assigned identifier.
    pub async fn add_record(&self, spec: PodSpec) -> Result<i64, ServiceError> {
        Ok(self.repository.create(spec).await?)
    }

    /// Remove a pod record by identifier.
    pub async fn delete_record(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.repository.delete(id).await?)
    }

    /// Overwrite a pod record.
    pub async fn update_record(&self, record: &PodRecord) -> Result<(), ServiceError> {
        Ok(self.repository.update(record).await?)
    }

    /// Fetch a pod record by identifier.
    pub async fn find_by_id(&self, id: i64) -> Result<PodRecord, ServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Fetch every pod record.
    pub async fn find_all(&self) -> Result<Vec<PodRecord>, ServiceError> {
        Ok(self.repository.find_all().await?)
    }
}
