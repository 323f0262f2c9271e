//! Centralized constants for manifest generation
//!
//! API versions, kinds and naming conventions shared by the core builder,
//! the providers and the serializer.

// =============================================================================
// API Versions
// =============================================================================

/// Core CAPI API version (Cluster, Machine, MachineDeployment)
pub const CAPI_CLUSTER_API_VERSION: &str = "cluster.x-k8s.io/v1alpha3";

/// Kubeadm bootstrap API version (KubeadmConfig, KubeadmConfigTemplate)
pub const KUBEADM_BOOTSTRAP_API_VERSION: &str = "bootstrap.cluster.x-k8s.io/v1alpha2";

/// Docker infrastructure API version (CAPD)
pub const DOCKER_INFRASTRUCTURE_API_VERSION: &str = "infrastructure.cluster.x-k8s.io/v1alpha2";

/// AWS infrastructure API version (CAPA)
pub const AWS_INFRASTRUCTURE_API_VERSION: &str = "infrastructure.cluster.x-k8s.io/v1alpha3";

/// Bare metal infrastructure API version (CAPBM)
pub const BAREMETAL_INFRASTRUCTURE_API_VERSION: &str = "infrastructure.cluster.x-k8s.io/v1alpha3";

// =============================================================================
// Kinds
// =============================================================================

/// Core cluster kind
pub const CLUSTER_KIND: &str = "Cluster";
/// Core machine kind
pub const MACHINE_KIND: &str = "Machine";
/// Core machine deployment kind
pub const MACHINE_DEPLOYMENT_KIND: &str = "MachineDeployment";

/// Kubeadm bootstrap config kind
pub const KUBEADM_CONFIG_KIND: &str = "KubeadmConfig";
/// Kubeadm bootstrap config template kind
pub const KUBEADM_CONFIG_TEMPLATE_KIND: &str = "KubeadmConfigTemplate";

/// Docker infrastructure cluster kind
pub const DOCKER_CLUSTER_KIND: &str = "DockerCluster";
/// Docker infrastructure machine kind
pub const DOCKER_MACHINE_KIND: &str = "DockerMachine";
/// Docker infrastructure machine template kind
pub const DOCKER_MACHINE_TEMPLATE_KIND: &str = "DockerMachineTemplate";

/// AWS infrastructure cluster kind
pub const AWS_CLUSTER_KIND: &str = "AWSCluster";
/// AWS infrastructure machine kind
pub const AWS_MACHINE_KIND: &str = "AWSMachine";
/// AWS infrastructure machine template kind
pub const AWS_MACHINE_TEMPLATE_KIND: &str = "AWSMachineTemplate";

/// Bare metal infrastructure cluster kind
pub const BAREMETAL_CLUSTER_KIND: &str = "BareMetalCluster";
/// Bare metal infrastructure machine kind
pub const BAREMETAL_MACHINE_KIND: &str = "BareMetalMachine";
/// Bare metal infrastructure machine template kind
pub const BAREMETAL_MACHINE_TEMPLATE_KIND: &str = "BareMetalMachineTemplate";

// =============================================================================
// Labels and Naming
// =============================================================================

/// Label tying every machine to its cluster
pub const CLUSTER_NAME_LABEL: &str = "cluster.x-k8s.io/cluster-name";

/// Label marking control plane machines
pub const CONTROL_PLANE_LABEL: &str = "cluster.x-k8s.io/control-plane";

/// Label tying machines to the MachineDeployment that owns them
pub const MACHINE_DEPLOYMENT_NAME_LABEL: &str = "cluster.x-k8s.io/deployment-name";

/// Name prefix for control plane machines
pub const CONTROL_PLANE_NAME_PREFIX: &str = "controlplane";

/// Name prefix for worker machines
pub const WORKER_NAME_PREFIX: &str = "worker";

/// Suffix appended to a role prefix in machine deployment mode
pub const MACHINE_DEPLOYMENT_SUFFIX: &str = "-md";

/// Suffix appended to a machine name for its bootstrap config
pub const BOOTSTRAP_CONFIG_SUFFIX: &str = "-config";

/// Bind port of a control plane node joining an existing control plane
pub const API_SERVER_BIND_PORT: u16 = 6443;

/// Document separator written before each manifest
pub const YAML_SEPARATOR: &str = "---";
