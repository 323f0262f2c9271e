//! AWS infrastructure provider (CAPA)
//!
//! Generates AWSCluster, AWSMachine and AWSMachineTemplate resources and
//! wires the in-tree AWS cloud provider into every kubeadm configuration.

use std::collections::BTreeMap;

use serde_json::json;

use super::{
    set_node_registration, string_map, template_kubeadm_spec, with_cluster_configuration,
    InfraProviderType, InfrastructureProvider,
};
use crate::constants::{
    AWS_CLUSTER_KIND, AWS_INFRASTRUCTURE_API_VERSION, AWS_MACHINE_KIND,
    AWS_MACHINE_TEMPLATE_KIND,
};
use crate::manifest::CAPIManifest;

const DEFAULT_REGION: &str = "us-west-2";
const DEFAULT_SSH_KEY_NAME: &str = "default";
const DEFAULT_INSTANCE_TYPE: &str = "t2.medium";
const DEFAULT_IAM_INSTANCE_PROFILE: &str = "nodes.cluster-api-provider-aws.sigs.k8s.io";

/// Node name taken from EC2 instance metadata
const NODE_NAME: &str = "'{{ ds.meta_data.local_hostname }}'";

/// AWS infrastructure provider
#[derive(Debug, Default, Clone)]
pub struct AwsProvider;

impl AwsProvider {
    /// Create a new AwsProvider
    pub fn new() -> Self {
        Self
    }

    fn machine_spec() -> serde_json::Value {
        json!({
            "instanceType": DEFAULT_INSTANCE_TYPE,
            "iamInstanceProfile": DEFAULT_IAM_INSTANCE_PROFILE,
            "sshKeyName": DEFAULT_SSH_KEY_NAME
        })
    }

    fn cloud_provider_args() -> serde_json::Value {
        json!({ "cloud-provider": "aws" })
    }

    fn node_registration() -> serde_json::Value {
        json!({
            "name": NODE_NAME,
            "kubeletExtraArgs": Self::cloud_provider_args()
        })
    }
}

impl InfrastructureProvider for AwsProvider {
    fn provider_type(&self) -> InfraProviderType {
        InfraProviderType::Aws
    }

    fn infra_cluster(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(AWS_INFRASTRUCTURE_API_VERSION, AWS_CLUSTER_KIND, name, namespace)
            .with_spec(json!({
                "region": DEFAULT_REGION,
                "sshKeyName": DEFAULT_SSH_KEY_NAME
            }))
    }

    fn infra_machine(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(AWS_INFRASTRUCTURE_API_VERSION, AWS_MACHINE_KIND, name, namespace)
            .with_spec(Self::machine_spec())
    }

    fn infra_machine_template(&self, name: &str, namespace: &str) -> CAPIManifest {
        CAPIManifest::new(
            AWS_INFRASTRUCTURE_API_VERSION,
            AWS_MACHINE_TEMPLATE_KIND,
            name,
            namespace,
        )
        .with_spec(json!({
            "template": {
                "spec": Self::machine_spec()
            }
        }))
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
            ("SSH_KEY_NAME", DEFAULT_SSH_KEY_NAME),
            ("CONTROL_PLANE_INSTANCE_TYPE", DEFAULT_INSTANCE_TYPE),
            ("MACHINE_DEPLOYMENT_INSTANCE_TYPE", DEFAULT_INSTANCE_TYPE),
            ("REGION", DEFAULT_REGION),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BootstrapProvider, KubeadmProvider};

    #[test]
    fn cluster_carries_region_and_ssh_key() {
        let cluster = AwsProvider::new().infra_cluster("my-cluster", "default");

        assert_eq!(cluster.kind, "AWSCluster");
        assert_eq!(cluster.api_version, "infrastructure.cluster.x-k8s.io/v1alpha3");
        let spec = cluster.spec.unwrap();
        assert_eq!(spec["region"], "us-west-2");
        assert_eq!(spec["sshKeyName"], "default");
    }

    #[test]
    fn machine_and_template_share_instance_defaults() {
        let provider = AwsProvider::new();
        let machine = provider.infra_machine("worker-0", "default");
        let template = provider.infra_machine_template("worker-md", "default");

        assert_eq!(machine.kind, "AWSMachine");
        assert_eq!(template.kind, "AWSMachineTemplate");
        assert_eq!(machine.spec.as_ref().unwrap()["instanceType"], "t2.medium");
        assert_eq!(
            template.spec.unwrap()["template"]["spec"],
            machine.spec.unwrap()
        );
    }

    #[test]
    fn init_config_gets_cloud_provider_everywhere() {
        let mut config = KubeadmProvider::new().config("controlplane-0-config", "default", true, 0);
        AwsProvider::new().set_bootstrap_config_infra_values(&mut config);

        let spec = config.spec.unwrap();
        let registration = &spec["initConfiguration"]["nodeRegistration"];
        assert_eq!(registration["name"], "'{{ ds.meta_data.local_hostname }}'");
        assert_eq!(registration["kubeletExtraArgs"]["cloud-provider"], "aws");
        assert_eq!(
            spec["clusterConfiguration"]["apiServer"]["extraArgs"]["cloud-provider"],
            "aws"
        );
        assert_eq!(
            spec["clusterConfiguration"]["controllerManager"]["extraArgs"]["cloud-provider"],
            "aws"
        );
    }

    /// Story: a control plane joiner keeps its controlPlane block when registration is injected
    #[test]
    fn control_plane_join_keeps_endpoint() {
        let mut config = KubeadmProvider::new().config("controlplane-1-config", "default", true, 1);
        AwsProvider::new().set_bootstrap_config_infra_values(&mut config);

        let join = &config.spec.as_ref().unwrap()["joinConfiguration"];
        assert_eq!(join["controlPlane"]["localAPIEndpoint"]["bindPort"], 6443);
        assert_eq!(join["nodeRegistration"]["kubeletExtraArgs"]["cloud-provider"], "aws");
    }

    #[test]
    fn environment_variables_describe_defaults() {
        let vars = AwsProvider::new().environment_variables();
        assert_eq!(vars.get("REGION").map(String::as_str), Some("us-west-2"));
        assert_eq!(vars.get("SSH_KEY_NAME").map(String::as_str), Some("default"));
        assert_eq!(vars.len(), 4);
    }
}
