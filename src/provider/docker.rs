//! Docker/Kind infrastructure provider (CAPD)
//!
//! This module implements [`InfrastructureProvider`] for Docker clusters,
//! which is useful for local development and testing.
//!
//! # Generated Resources
//!
//! 1. **DockerCluster** - Docker-specific cluster infrastructure
//! 2. **DockerMachine** - one per expanded machine
//! 3. **DockerMachineTemplate** - shared by a machine deployment
//!
//! Bootstrap configs get kubelet eviction thresholds disabled (node disks in
//! kind are the host disk) and the API server certificate covers localhost.

use std::collections::BTreeMap;

use serde_json::json;

use super::{
    set_node_registration, template_kubeadm_spec, with_cluster_configuration, InfraProviderType,
    InfrastructureProvider,
};
use crate::constants::{
    DOCKER_CLUSTER_KIND, DOCKER_INFRASTRUCTURE_API_VERSION, DOCKER_MACHINE_KIND,
    DOCKER_MACHINE_TEMPLATE_KIND,
};
use crate::manifest::CAPIManifest;

/// Kubelet eviction thresholds disabled for kind nodes
const EVICTION_HARD: &str = "nodefs.available<0%,nodefs.inodesFree<0%,imagefs.available<0%";

/// Docker/Kind infrastructure provider
#[derive(Debug, Default, Clone)]
pub struct DockerProvider;

impl DockerProvider {
    /// Create a new DockerProvider
    pub fn new() -> Self {
        Self
    }

    fn node_registration() -> serde_json::Value {
        json!({
            "kubeletExtraArgs": {
                "eviction-hard": EVICTION_HARD
            }
        })
    }
}

impl InfrastructureProvider for DockerProvider {
    fn provider_type(&self) -> InfraProviderType {
        InfraProviderType::Docker
    }

    /// DockerCluster has minimal spec - load balancing is handled by CAPD itself
    fn infra_cluster(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            DOCKER_INFRASTRUCTURE_API_VERSION,
            DOCKER_CLUSTER_KIND,
            name,
            namespace,
        )
        .with_spec(json!({}))
    }

    fn infra_machine(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            DOCKER_INFRASTRUCTURE_API_VERSION,
            DOCKER_MACHINE_KIND,
            name,
            namespace,
        )
        .with_spec(json!({}))
    }

    fn infra_machine_template(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            DOCKER_INFRASTRUCTURE_API_VERSION,
            DOCKER_MACHINE_TEMPLATE_KIND,
            name,
            namespace,
        )
        .with_spec(json!({
            "template": {
                "spec": {}
            }
        }))
    }

    fn set_bootstrap_config_infra_values(&self, config: &mut CAPIManifest) {
        let Some(spec) = config.spec.as_mut() else {
            return;
        };
        set_node_registration(spec, Self::node_registration());
        with_cluster_configuration(spec, |cluster_config| {
            cluster_config["apiServer"] = json!({
                "certSANs": ["localhost", "127.0.0.1"]
            });
            cluster_config["controllerManager"] = json!({
                "extraArgs": {
                    "enable-hostpath-provisioner": "true"
                }
            });
        });
    }

    fn set_bootstrap_config_template_infra_values(&self, template: &mut CAPIManifest) {
        if let Some(spec) = template_kubeadm_spec(template) {
            set_node_registration(spec, Self::node_registration());
        }
    }

    /// CAPD needs no credentials or sizing defaults
    fn environment_variables(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BootstrapProvider, KubeadmProvider};

    mod generated_resources {
        use super::*;

        #[test]
        fn infra_cluster_uses_docker_kind_and_version() {
            let cluster = DockerProvider::new().infra_cluster("my-cluster", "default");

            assert_eq!(cluster.kind, "DockerCluster");
            assert_eq!(cluster.api_version, "infrastructure.cluster.x-k8s.io/v1alpha2");
            assert_eq!(cluster.name(), "my-cluster");
            assert_eq!(cluster.namespace(), "default");
        }

        #[test]
        fn machine_and_template_use_matching_kinds() {
            let provider = DockerProvider::new();
            let machine = provider.infra_machine("worker-0", "default");
            let template = provider.infra_machine_template("worker-md", "default");

            assert_eq!(machine.kind, "DockerMachine");
            assert_eq!(template.kind, "DockerMachineTemplate");
            assert!(template.spec.as_ref().unwrap().pointer("/template/spec").is_some());
        }

        #[test]
        fn no_environment_variables() {
            assert!(DockerProvider::new().environment_variables().is_empty());
        }
    }

    /// Bootstrap value injection
    ///
    /// Only the populated kubeadm branch is touched, the others stay absent.
    mod bootstrap_values {
        use super::*;

        #[test]
        fn init_config_gets_eviction_args_and_cert_sans() {
            let mut config = KubeadmProvider::new().config("controlplane-0-config", "default", true, 0);
            DockerProvider::new().set_bootstrap_config_infra_values(&mut config);

            let spec = config.spec.unwrap();
            assert_eq!(
                spec["initConfiguration"]["nodeRegistration"]["kubeletExtraArgs"]["eviction-hard"],
                EVICTION_HARD
            );
            assert_eq!(
                spec["clusterConfiguration"]["apiServer"]["certSANs"],
                json!(["localhost", "127.0.0.1"])
            );
            assert!(spec.get("joinConfiguration").is_none());
        }

        #[test]
        fn worker_join_config_gets_eviction_args_only() {
            let mut config = KubeadmProvider::new().config("worker-0-config", "default", false, 0);
            DockerProvider::new().set_bootstrap_config_infra_values(&mut config);

            let spec = config.spec.unwrap();
            assert_eq!(
                spec["joinConfiguration"]["nodeRegistration"]["kubeletExtraArgs"]["eviction-hard"],
                EVICTION_HARD
            );
            assert!(spec.get("initConfiguration").is_none());
            assert!(spec.get("clusterConfiguration").is_none());
        }

        #[test]
        fn template_join_config_gets_eviction_args() {
            let mut template = KubeadmProvider::new().config_template("worker-md", "default");
            DockerProvider::new().set_bootstrap_config_template_infra_values(&mut template);

            let spec = template.spec.unwrap();
            assert_eq!(
                spec["template"]["spec"]["joinConfiguration"]["nodeRegistration"]
                    ["kubeletExtraArgs"]["eviction-hard"],
                EVICTION_HARD
            );
        }

        #[test]
        fn config_without_spec_is_left_alone() {
            let mut config = CAPIManifest::new("v1", "KubeadmConfig", "empty", "default");
            DockerProvider::new().set_bootstrap_config_infra_values(&mut config);
            assert!(config.spec.is_none());
        }
    }
}
