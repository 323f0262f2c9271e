//! Kubeadm bootstrap provider (CABPK)

use serde_json::json;

use super::{BootstrapProvider, BootstrapProviderType};
use crate::constants::{
    API_SERVER_BIND_PORT, KUBEADM_BOOTSTRAP_API_VERSION, KUBEADM_CONFIG_KIND,
    KUBEADM_CONFIG_TEMPLATE_KIND,
};
use crate::manifest::CAPIManifest;

/// Kubeadm bootstrap provider
#[derive(Debug, Default, Clone)]
pub struct KubeadmProvider;

impl KubeadmProvider {
    /// Create a new KubeadmProvider
    pub fn new() -> Self {
        Self
    }
}

impl BootstrapProvider for KubeadmProvider {
    fn provider_type(&self) -> BootstrapProviderType {
        BootstrapProviderType::Kubeadm
    }

    fn config(
        &self,
        name: &str,
        namespace: &str,
        is_control_plane: bool,
        index: usize,
    ) -> CAPIManifest {
        let spec = match (is_control_plane, index) {
            // The first control plane node runs `kubeadm init`
            (true, 0) => json!({
                "initConfiguration": {},
                "clusterConfiguration": {}
            }),
            (true, _) => json!({
                "joinConfiguration": {
                    "controlPlane": {
                        "localAPIEndpoint": {
                            "bindPort": API_SERVER_BIND_PORT
                        }
                    }
                }
            }),
            (false, _) => json!({
                "joinConfiguration": {}
            }),
        };

        CAPIManifest::new(
            KUBEADM_BOOTSTRAP_API_VERSION,
            KUBEADM_CONFIG_KIND,
            name,
            namespace,
        )
        .with_spec(spec)
    }

    fn config_template(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            KUBEADM_BOOTSTRAP_API_VERSION,
            KUBEADM_CONFIG_TEMPLATE_KIND,
            name,
            namespace,
        )
        .with_spec(json!({
            "template": {
                "spec": {
                    "joinConfiguration": {}
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Control plane tie-break
    ///
    /// Exactly one node initializes the cluster; every other control plane
    /// node joins it as a control plane member.
    mod control_plane_tie_break {
        use super::*;

        #[test]
        fn first_control_plane_initializes_cluster() {
            let config = KubeadmProvider::new().config("controlplane-0-config", "default", true, 0);

            let spec = config.spec.unwrap();
            assert_eq!(spec["initConfiguration"], json!({}));
            assert_eq!(spec["clusterConfiguration"], json!({}));
            assert!(spec.get("joinConfiguration").is_none());
        }

        #[test]
        fn later_control_planes_join_control_plane() {
            let provider = KubeadmProvider::new();
            for index in 1..3 {
                let name = format!("controlplane-{index}-config");
                let spec = provider.config(&name, "default", true, index).spec.unwrap();

                assert!(spec.get("initConfiguration").is_none());
                assert!(spec.get("clusterConfiguration").is_none());
                assert_eq!(
                    spec["joinConfiguration"]["controlPlane"]["localAPIEndpoint"]["bindPort"],
                    6443
                );
            }
        }

        #[test]
        fn workers_join_without_control_plane_block() {
            let provider = KubeadmProvider::new();
            for index in 0..2 {
                let spec = provider
                    .config("worker-config", "default", false, index)
                    .spec
                    .unwrap();
                assert_eq!(spec, json!({ "joinConfiguration": {} }));
            }
        }
    }

    #[test]
    fn config_uses_kubeadm_kind_and_version() {
        let config = KubeadmProvider::new().config("worker-0-config", "capi", false, 0);

        assert_eq!(config.kind, "KubeadmConfig");
        assert_eq!(config.api_version, "bootstrap.cluster.x-k8s.io/v1alpha2");
        assert_eq!(config.name(), "worker-0-config");
        assert_eq!(config.namespace(), "capi");
    }

    #[test]
    fn template_is_join_only() {
        let template = KubeadmProvider::new().config_template("worker-md", "default");

        assert_eq!(template.kind, "KubeadmConfigTemplate");
        assert_eq!(
            template.spec.unwrap(),
            json!({ "template": { "spec": { "joinConfiguration": {} } } })
        );
    }
}
