//! Core data models for the pod director

use serde::{Deserialize, Serialize};

/// Desired state for a single managed pod deployment
///
/// `name` and `namespace` together identify at most one live cluster
/// resource. The spec is the sole input to resource construction; the
/// Deployment sent to the cluster is rebuilt from it on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub replicas: i32,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
    #[serde(default)]
    pub env: Vec<EnvPair>,
    pub cpu_max: f64,
    pub memory_max: f64,
    #[serde(default)]
    pub pull_policy: String,
}

/// A container port declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    pub container_port: i32,
    #[serde(default)]
    pub protocol: String,
}

/// An environment variable entry, order-preserving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvPair {
    pub key: String,
    pub value: String,
}

/// Persisted pod record
///
/// The identifier is assigned by the repository on insert and is opaque
/// to everything else. A record corresponds to zero or one live
/// Deployments, matched by (namespace, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodRecord {
    pub id: i64,
    #[serde(flatten)]
    pub spec: PodSpec,
}

impl PodRecord {
    pub fn new(id: i64, spec: PodSpec) -> Self {
        Self { id, spec }
    }
}
