//! Translation from domain pod specifications to Deployment resources
//!
//! Everything in this module is a pure function of the input spec: no
//! I/O, no retained state. Callers rebuild the resource from the spec on
//! every cluster call so a stale instance can never leak between calls.

use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

use crate::models::PodSpec;

/// Label key correlating a Deployment and its pods with the owning spec.
/// This is the only selection key; nothing else should be relied on.
pub const APP_LABEL: &str = "app-name";

/// Build the target Deployment for a pod spec.
///
/// Requests are set equal to limits for both CPU and memory; there is no
/// burstable tier.
pub fn build_deployment(spec: &PodSpec) -> appsv1::Deployment {
    appsv1::Deployment {
        metadata: ObjectMeta {
            name: Some(spec.name.clone()),
            namespace: Some(spec.namespace.clone()),
            labels: Some(selector_labels(spec)),
            ..ObjectMeta::default()
        },
        spec: Some(appsv1::DeploymentSpec {
            replicas: Some(spec.replicas),
            selector: metav1::LabelSelector {
                match_labels: Some(selector_labels(spec)),
                ..metav1::LabelSelector::default()
            },
            template: corev1::PodTemplateSpec {
                metadata: Some(metav1::ObjectMeta {
                    labels: Some(selector_labels(spec)),
                    ..metav1::ObjectMeta::default()
                }),
                spec: Some(corev1::PodSpec {
                    containers: vec![corev1::Container {
                        name: spec.name.clone(),
                        image: Some(spec.image.clone()),
                        ports: Some(container_ports(spec)),
                        env: Some(env_vars(spec)),
                        resources: Some(resource_requirements(spec)),
                        image_pull_policy: Some(pull_policy(&spec.pull_policy)),
                        ..corev1::Container::default()
                    }],
                    ..corev1::PodSpec::default()
                }),
            },
            ..appsv1::DeploymentSpec::default()
        }),
        ..appsv1::Deployment::default()
    }
}

fn selector_labels(spec: &PodSpec) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), spec.name.clone())])
}

/// Port names are synthesized from the port number, which keeps them
/// unique within the container whenever the numbers are.
fn container_ports(spec: &PodSpec) -> Vec<corev1::ContainerPort> {
    spec.ports
        .iter()
        .map(|p| corev1::ContainerPort {
            name: Some(format!("port-{}", p.container_port)),
            container_port: p.container_port,
            protocol: Some(protocol(&p.protocol)),
            ..corev1::ContainerPort::default()
        })
        .collect()
}

fn env_vars(spec: &PodSpec) -> Vec<corev1::EnvVar> {
    spec.env
        .iter()
        .map(|e| corev1::EnvVar {
            name: e.key.clone(),
            value: Some(e.value.clone()),
            value_from: None,
        })
        .collect()
}

fn resource_requirements(spec: &PodSpec) -> corev1::ResourceRequirements {
    let ceiling = BTreeMap::from([
        ("cpu".to_string(), quantity(spec.cpu_max)),
        ("memory".to_string(), quantity(spec.memory_max)),
    ]);
    corev1::ResourceRequirements {
        limits: Some(ceiling.clone()),
        requests: Some(ceiling),
        ..corev1::ResourceRequirements::default()
    }
}

/// Fixed-precision decimal rendering, so a float like 0.1 never crosses
/// the serialization boundary with representation artifacts.
fn quantity(value: f64) -> Quantity {
    Quantity(format!("{:.6}", value))
}

/// Closed protocol mapping; anything unrecognized falls back to TCP.
fn protocol(raw: &str) -> String {
    match raw {
        "TCP" | "UDP" | "SCTP" => raw.to_string(),
        _ => "TCP".to_string(),
    }
}

/// Closed pull-policy mapping; anything unrecognized falls back to Always.
fn pull_policy(raw: &str) -> String {
    match raw {
        "Always" | "Never" | "IfNotPresent" => raw.to_string(),
        _ => "Always".to_string(),
    }
}
