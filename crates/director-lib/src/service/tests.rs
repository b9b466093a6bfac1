//! Service tests against a scripted cluster facade
//!
//! These tests verify:
//! - Existence checks gate create/update and short-circuit without
//!   mutating the cluster
//! - The cluster-delete-then-record-delete ordering invariant
//! - The stable wire triple on every error kind

use super::*;
use crate::mapper::build_deployment;
use crate::models::{EnvPair, PodRecord, PodSpec, PortSpec};
use crate::repository::MemoryRepository;
use anyhow::anyhow;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Cluster facade double that records every call and can be scripted to
/// fail per operation.
#[derive(Default)]
struct FakeCluster {
    deployments: Mutex<HashMap<(String, String), Deployment>>,
    calls: Mutex<Vec<&'static str>>,
    fail_get: AtomicBool,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeCluster {
    fn record_call(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn insert(&self, namespace: &str, name: &str, deployment: Deployment) {
        self.deployments
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), deployment);
    }

    fn stored(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.deployments
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl DeploymentApi for FakeCluster {
    async fn get(&self, namespace: &str, name: &str) -> anyhow::Result<Option<Deployment>> {
        self.record_call("get");
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.stored(namespace, name))
    }

    async fn create(&self, namespace: &str, deployment: &Deployment) -> anyhow::Result<()> {
        self.record_call("create");
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(anyhow!("admission webhook denied the request"));
        }
        let name = deployment.metadata.name.clone().unwrap();
        self.insert(namespace, &name, deployment.clone());
        Ok(())
    }

    async fn update(&self, namespace: &str, deployment: &Deployment) -> anyhow::Result<()> {
        self.record_call("update");
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(anyhow!("conflict"));
        }
        let name = deployment.metadata.name.clone().unwrap();
        self.insert(namespace, &name, deployment.clone());
        Ok(())
    }

    async fn delete(&self, namespace: &str, name: &str) -> anyhow::Result<()> {
        self.record_call("delete");
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("timeout talking to apiserver"));
        }
        self.deployments
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}

fn web_spec() -> PodSpec {
    PodSpec {
        name: "web".to_string(),
        namespace: "default".to_string(),
        image: "nginx:1.25".to_string(),
        replicas: 1,
        ports: vec![PortSpec {
            container_port: 8080,
            protocol: "TCP".to_string(),
        }],
        env: vec![EnvPair {
            key: "MODE".to_string(),
            value: "production".to_string(),
        }],
        cpu_max: 0.5,
        memory_max: 256.0,
        pull_policy: "Always".to_string(),
    }
}

fn setup() -> (PodService, Arc<MemoryRepository>, Arc<FakeCluster>) {
    let repository = Arc::new(MemoryRepository::new());
    let cluster = Arc::new(FakeCluster::default());
    let service = PodService::new(
        repository.clone(),
        cluster.clone(),
        DirectorMetrics::new(),
    );
    (service, repository, cluster)
}

#[tokio::test]
async fn create_issues_exactly_one_create_when_absent() {
    let (service, _, cluster) = setup();

    service.create_to_cluster(&web_spec()).await.unwrap();

    assert_eq!(cluster.calls(), vec!["get", "create"]);
    let stored = cluster.stored("default", "web").unwrap();
    assert_eq!(stored.spec.as_ref().unwrap().replicas, Some(1));
}

#[tokio::test]
async fn create_rejects_existing_deployment_without_mutation() {
    let (service, _, cluster) = setup();
    let spec = web_spec();
    cluster.insert("default", "web", build_deployment(&spec));

    let err = service.create_to_cluster(&spec).await.unwrap_err();

    assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    assert_eq!(err.code(), "1");
    assert_eq!(err.status(), 1003);
    // Existence check only; no create was attempted.
    assert_eq!(cluster.calls(), vec!["get"]);
}

#[tokio::test]
async fn create_surfaces_transport_failure() {
    let (service, _, cluster) = setup();
    cluster.fail_create.store(true, Ordering::SeqCst);

    let err = service.create_to_cluster(&web_spec()).await.unwrap_err();

    assert!(matches!(err, ServiceError::ClusterCallFailed { .. }));
    assert_eq!(err.code(), "3");
    assert_eq!(err.status(), 1005);
    assert!(err.to_string().contains("default/web"));
}

#[tokio::test]
async fn create_surfaces_existence_check_failure() {
    let (service, _, cluster) = setup();
    cluster.fail_get.store(true, Ordering::SeqCst);

    let err = service.create_to_cluster(&web_spec()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::ClusterCallFailed { operation: "get", .. }
    ));
    assert_eq!(cluster.calls(), vec!["get"]);
}

#[tokio::test]
async fn update_replaces_existing_spec_in_full() {
    let (service, _, cluster) = setup();
    let mut spec = web_spec();
    cluster.insert("default", "web", build_deployment(&spec));

    spec.replicas = 3;
    spec.image = "nginx:1.27".to_string();
    service.update_in_cluster(&spec).await.unwrap();

    assert_eq!(cluster.calls(), vec!["get", "update"]);
    let stored = cluster.stored("default", "web").unwrap();
    let stored_spec = stored.spec.unwrap();
    assert_eq!(stored_spec.replicas, Some(3));
    let container = &stored_spec.template.spec.unwrap().containers[0];
    assert_eq!(container.image.as_deref(), Some("nginx:1.27"));
}

#[tokio::test]
async fn update_rejects_missing_deployment_without_mutation() {
    let (service, _, cluster) = setup();

    let err = service.update_in_cluster(&web_spec()).await.unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { .. }));
    assert_eq!(err.code(), "2");
    assert_eq!(err.status(), 1004);
    assert_eq!(cluster.calls(), vec!["get"]);
}

#[tokio::test]
async fn update_surfaces_transport_failure() {
    let (service, _, cluster) = setup();
    let spec = web_spec();
    cluster.insert("default", "web", build_deployment(&spec));
    cluster.fail_update.store(true, Ordering::SeqCst);

    let err = service.update_in_cluster(&spec).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::ClusterCallFailed { operation: "update", .. }
    ));
}

#[tokio::test]
async fn delete_keeps_record_when_cluster_delete_fails() {
    let (service, repository, cluster) = setup();
    let spec = web_spec();
    let id = service.add_record(spec.clone()).await.unwrap();
    cluster.insert("default", "web", build_deployment(&spec));
    cluster.fail_delete.store(true, Ordering::SeqCst);

    let record = repository.find_by_id(id).await.unwrap();
    let err = service.delete_from_cluster(&record).await.unwrap_err();

    assert!(matches!(err, ServiceError::ClusterCallFailed { .. }));
    // The record must survive a failed cluster delete.
    assert!(repository.find_by_id(id).await.is_ok());
    assert!(cluster.stored("default", "web").is_some());
}

#[tokio::test]
async fn delete_removes_record_only_after_cluster_delete() {
    let (service, repository, cluster) = setup();
    let spec = web_spec();
    let id = service.add_record(spec.clone()).await.unwrap();
    cluster.insert("default", "web", build_deployment(&spec));

    let record = repository.find_by_id(id).await.unwrap();
    service.delete_from_cluster(&record).await.unwrap();

    assert_eq!(cluster.calls(), vec!["delete"]);
    assert!(cluster.stored("default", "web").is_none());
    assert!(repository.find_by_id(id).await.is_err());
}

#[tokio::test]
async fn delete_reports_record_failure_but_cluster_deletion_stands() {
    let (service, _, cluster) = setup();
    let spec = web_spec();
    cluster.insert("default", "web", build_deployment(&spec));

    // A record the repository has never seen: the cluster delete goes
    // through, the record delete fails.
    let record = PodRecord::new(99, spec);
    let err = service.delete_from_cluster(&record).await.unwrap_err();

    assert!(matches!(err, ServiceError::Repository(_)));
    assert_eq!(err.code(), "4");
    assert_eq!(err.status(), 1006);
    assert!(cluster.stored("default", "web").is_none());
}

#[tokio::test]
async fn record_passthroughs_delegate_to_repository() {
    let (service, _, cluster) = setup();

    let id = service.add_record(web_spec()).await.unwrap();
    let mut record = service.find_by_id(id).await.unwrap();
    assert_eq!(record.spec.name, "web");

    record.spec.replicas = 4;
    service.update_record(&record).await.unwrap();
    assert_eq!(service.find_by_id(id).await.unwrap().spec.replicas, 4);

    assert_eq!(service.find_all().await.unwrap().len(), 1);

    service.delete_record(id).await.unwrap();
    assert!(service.find_all().await.unwrap().is_empty());

    // Record CRUD never touches the cluster.
    assert!(cluster.calls().is_empty());
}

#[tokio::test]
async fn find_by_id_missing_surfaces_repository_error() {
    let (service, _, _) = setup();

    let err = service.find_by_id(12345).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repository(RepositoryError::NotFound(12345))
    ));
}
