//! Core CAPI resource builder
//!
//! Provider-agnostic construction of the Cluster, Machine and
//! MachineDeployment resources. Every function is pure: it takes the
//! already-built infrastructure and bootstrap manifests and wires references
//! to them by API version, kind, name and namespace.
//!
//! Naming is load-bearing. Machines are named `<prefix>-<index>`, their
//! bootstrap configs `<machine>-config` (lower-cased), and machine deployment
//! resources share the `<prefix>-md` name.

use std::collections::BTreeMap;

use serde_json::json;

use crate::constants::{
    BOOTSTRAP_CONFIG_SUFFIX, CAPI_CLUSTER_API_VERSION, CLUSTER_KIND, CLUSTER_NAME_LABEL,
    CONTROL_PLANE_LABEL, CONTROL_PLANE_NAME_PREFIX, MACHINE_DEPLOYMENT_KIND,
    MACHINE_DEPLOYMENT_NAME_LABEL, MACHINE_DEPLOYMENT_SUFFIX, MACHINE_KIND, WORKER_NAME_PREFIX,
};
use crate::manifest::CAPIManifest;

/// Pod network CIDR for generated clusters
const POD_CIDR: &str = "192.168.0.0/16";
/// Service network CIDR for generated clusters
const SERVICE_CIDR: &str = "10.128.0.0/12";

/// Common cluster configuration for CAPI manifest generation
#[derive(Clone, Copy, Debug)]
pub struct ClusterConfig<'a> {
    /// Cluster name
    pub name: &'a str,
    /// Kubernetes namespace for CAPI resources
    pub namespace: &'a str,
    /// Kubernetes version (e.g., "v1.15.3")
    pub k8s_version: &'a str,
}

/// Role of a machine within the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineRole {
    /// Runs the Kubernetes control plane
    ControlPlane,
    /// Runs workloads
    Worker,
}

impl MachineRole {
    /// Prefix used to name machines of this role
    pub fn name_prefix(self) -> &'static str {
        match self {
            Self::ControlPlane => CONTROL_PLANE_NAME_PREFIX,
            Self::Worker => WORKER_NAME_PREFIX,
        }
    }

    /// Whether machines of this role run the control plane
    pub fn is_control_plane(self) -> bool {
        self == Self::ControlPlane
    }
}

/// Name of the `index`-th machine with the given prefix
pub fn machine_name(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index}")
}

/// Name of the bootstrap config belonging to a machine
pub fn bootstrap_config_name(machine_name: &str) -> String {
    format!("{}{}", machine_name.to_lowercase(), BOOTSTRAP_CONFIG_SUFFIX)
}

/// Shared name of the machine deployment resources for a prefix
pub fn machine_deployment_name(prefix: &str) -> String {
    format!("{prefix}{MACHINE_DEPLOYMENT_SUFFIX}")
}

/// Labels selecting every machine of a cluster
fn cluster_labels(cluster_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(CLUSTER_NAME_LABEL.to_string(), cluster_name.to_string())])
}

/// Generate the main CAPI Cluster resource
///
/// The only provider-specific part is the infrastructureRef, which points to
/// the provider's infrastructure cluster (DockerCluster, AWSCluster, ...).
pub fn generate_cluster(config: &ClusterConfig, infra_cluster: &CAPIManifest) -> CAPIManifest {
    let spec = json!({
        "clusterNetwork": {
            "pods": {
                "cidrBlocks": [POD_CIDR]
            },
            "services": {
                "cidrBlocks": [SERVICE_CIDR]
            }
        },
        "infrastructureRef": infra_cluster.object_ref()
    });

    CAPIManifest::new(
        CAPI_CLUSTER_API_VERSION,
        CLUSTER_KIND,
        config.name,
        config.namespace,
    )
    .with_spec(spec)
}

/// Generate a Machine referencing its bootstrap config and infrastructure machine
///
/// Control plane machines additionally carry the control plane label.
pub fn generate_machine(
    config: &ClusterConfig,
    name: &str,
    role: MachineRole,
    bootstrap_config: &CAPIManifest,
    infra_machine: &CAPIManifest,
) -> CAPIManifest {
    let mut labels = cluster_labels(config.name);
    if role.is_control_plane() {
        labels.insert(CONTROL_PLANE_LABEL.to_string(), "true".to_string());
    }

    let spec = json!({
        "clusterName": config.name,
        "version": config.k8s_version,
        "bootstrap": {
            "configRef": bootstrap_config.object_ref()
        },
        "infrastructureRef": infra_machine.object_ref()
    });

    CAPIManifest::new(CAPI_CLUSTER_API_VERSION, MACHINE_KIND, name, config.namespace)
        .with_labels(labels)
        .with_spec(spec)
}

/// Generate a MachineDeployment stamping out `replicas` worker machines
///
/// The selector carries the deployment name label so standalone machines of
/// the same cluster (control planes in particular) are never adopted.
pub fn generate_machine_deployment(
    config: &ClusterConfig,
    name: &str,
    replicas: i32,
    machine_template: &CAPIManifest,
    config_template: &CAPIManifest,
) -> CAPIManifest {
    let mut labels = cluster_labels(config.name);
    labels.insert(MACHINE_DEPLOYMENT_NAME_LABEL.to_string(), name.to_string());

    let spec = json!({
        "clusterName": config.name,
        "replicas": replicas,
        "selector": {
            "matchLabels": labels
        },
        "template": {
            "metadata": {
                "labels": labels
            },
            "spec": {
                "clusterName": config.name,
                "version": config.k8s_version,
                "bootstrap": {
                    "configRef": config_template.object_ref()
                },
                "infrastructureRef": machine_template.object_ref()
            }
        }
    });

    CAPIManifest::new(
        CAPI_CLUSTER_API_VERSION,
        MACHINE_DEPLOYMENT_KIND,
        name,
        config.namespace,
    )
    .with_labels(labels)
    .with_spec(spec)
}
