//! Bare metal infrastructure provider (CAPBM)
//!
//! Machines boot a fixed RHCOS image served from the provisioning network
//! and read their user data from a pre-created secret.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::SecretReference;
use serde_json::json;

use super::{
    set_node_registration, string_map, template_kubeadm_spec, with_cluster_configuration,
    InfraProviderType, InfrastructureProvider,
};
use crate::constants::{
    BAREMETAL_CLUSTER_KIND, BAREMETAL_INFRASTRUCTURE_API_VERSION, BAREMETAL_MACHINE_KIND,
    BAREMETAL_MACHINE_TEMPLATE_KIND,
};
use crate::manifest::CAPIManifest;

const IMAGE_URL: &str = "http://172.22.0.1/images/rhcos-ootpa-latest.qcow2";
const IMAGE_CHECKSUM: &str = "http://172.22.0.1/images/rhcos-ootpa-latest.qcow2.md5sum";
const USER_DATA_SECRET: &str = "worker-user-data";
const USER_DATA_NAMESPACE: &str = "otherns";

/// Node name taken from the host's datasource metadata
const NODE_NAME: &str = "'{{ ds.meta_data.hostname }}'";

/// Bare metal infrastructure provider
#[derive(Debug, Default, Clone)]
pub struct BareMetalProvider;

impl BareMetalProvider {
    /// Create a new BareMetalProvider
    pub fn new() -> Self {
        Self
    }

    fn cloud_provider_args() -> serde_json::Value {
        json!({ "cloud-provider": "baremetal" })
    }

    fn node_registration() -> serde_json::Value {
        json!({
            "name": NODE_NAME,
            "kubeletExtraArgs": Self::cloud_provider_args()
        })
    }
}

impl InfrastructureProvider for BareMetalProvider {
    fn provider_type(&self) -> InfraProviderType {
        InfraProviderType::BareMetal
    }

    fn infra_cluster(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            BAREMETAL_INFRASTRUCTURE_API_VERSION,
            BAREMETAL_CLUSTER_KIND,
            name,
            namespace,
        )
    }

    fn infra_machine(&self, name: &str, namespace: &str) -> CAPIManifest {
        let user_data = SecretReference {
            name: Some(USER_DATA_SECRET.to_string()),
            namespace: Some(USER_DATA_NAMESPACE.to_string()),
        };

        CAPIManifest::new(
            BAREMETAL_INFRASTRUCTURE_API_VERSION,
            BAREMETAL_MACHINE_KIND,
            name,
            namespace,
        )
        .with_spec(json!({
            "image": {
                "url": IMAGE_URL,
                "checksum": IMAGE_CHECKSUM
            },
            "userData": user_data
        }))
    }

    fn infra_machine_template(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            BAREMETAL_INFRASTRUCTURE_API_VERSION,
            BAREMETAL_MACHINE_TEMPLATE_KIND,
            name,
            namespace,
        )
    }

    fn set_bootstrap_config_infra_values(&self, config: &mut CAPIManifest) {
        let Some(spec) = config.spec.as_mut() else {
            return;
        };
        set_node_registration(spec, Self::node_registration());
        with_cluster_configuration(spec, |cluster_config| {
            cluster_config["apiServer"] = json!({ "extraArgs": Self::cloud_provider_args() });
            cluster_config["controllerManager"] =
                json!({ "extraArgs": Self::cloud_provider_args() });
        });
    }

    fn set_bootstrap_config_template_infra_values(&self, template: &mut CAPIManifest) {
        if let Some(spec) = template_kubeadm_spec(template) {
            set_node_registration(spec, Self::node_registration());
        }
    }

    fn environment_variables(&self) -> BTreeMap<String, String> {
        string_map(&[
            ("SSH_KEY_NAME", "default"),
            ("CONTROL_PLANE_INSTANCE_TYPE", "t2.medium"),
            ("MACHINE_DEPLOYMENT_INSTANCE_TYPE", "t2.medium"),
            ("REGION", "us-west-2"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BootstrapProvider, KubeadmProvider};

    #[test]
    fn machine_boots_image_with_user_data_secret() {
        let machine = BareMetalProvider::new().infra_machine("controlplane-0", "default");

        assert_eq!(machine.kind, "BareMetalMachine");
        let spec = machine.spec.unwrap();
        assert_eq!(spec["image"]["url"], IMAGE_URL);
        assert_eq!(spec["image"]["checksum"], IMAGE_CHECKSUM);
        assert_eq!(
            spec["userData"],
            json!({ "name": "worker-user-data", "namespace": "otherns" })
        );
    }

    #[test]
    fn cluster_and_template_have_no_spec() {
        let provider = BareMetalProvider::new();
        let cluster = provider.infra_cluster("my-cluster", "default");
        let template = provider.infra_machine_template("worker-md", "default");

        assert_eq!(cluster.kind, "BareMetalCluster");
        assert_eq!(template.kind, "BareMetalMachineTemplate");
        assert!(cluster.spec.is_none());
        assert!(template.spec.is_none());
    }

    #[test]
    fn worker_join_gets_quoted_hostname() {
        let mut config = KubeadmProvider::new().config("worker-0-config", "default", false, 0);
        BareMetalProvider::new().set_bootstrap_config_infra_values(&mut config);

        let registration = &config.spec.as_ref().unwrap()["joinConfiguration"]["nodeRegistration"];
        assert_eq!(registration["name"], "'{{ ds.meta_data.hostname }}'");
        assert_eq!(registration["kubeletExtraArgs"]["cloud-provider"], "baremetal");
    }

    #[test]
    fn init_config_gets_control_plane_args() {
        let mut config = KubeadmProvider::new().config("controlplane-0-config", "default", true, 0);
        BareMetalProvider::new().set_bootstrap_config_infra_values(&mut config);

        let spec = config.spec.unwrap();
        assert_eq!(
            spec["clusterConfiguration"]["apiServer"]["extraArgs"]["cloud-provider"],
            "baremetal"
        );
        assert_eq!(
            spec["clusterConfiguration"]["controllerManager"]["extraArgs"]["cloud-provider"],
            "baremetal"
        );
    }

    #[test]
    fn template_values_reach_join_configuration() {
        let mut template = KubeadmProvider::new().config_template("worker-md", "default");
        BareMetalProvider::new().set_bootstrap_config_template_infra_values(&mut template);

        let spec = template.spec.unwrap();
        assert_eq!(
            spec["template"]["spec"]["joinConfiguration"]["nodeRegistration"]["name"],
            "'{{ ds.meta_data.hostname }}'"
        );
    }
}
