//! Provider abstraction layer
//!
//! Two capability sets drive manifest generation:
//!
//! - [`InfrastructureProvider`] builds the infrastructure-specific resources
//!   (DockerCluster, AWSMachine, ...) and injects provider values into
//!   bootstrap configs built elsewhere.
//! - [`BootstrapProvider`] builds the per-machine bootstrap configs and the
//!   shared config template used by machine deployments.
//!
//! # Supported Providers
//!
//! - [`DockerProvider`] - Docker/Kind provider for local development
//! - [`AwsProvider`] - Amazon Web Services (CAPA)
//! - [`BareMetalProvider`] - Bare metal hosts (CAPBM)
//! - [`KubeadmProvider`] - Kubeadm bootstrap (CABPK)
//!
//! Provider selection is a closed set. Identifiers resolve case-insensitively
//! through [`resolve_infra_provider`] and [`resolve_bootstrap_provider`].

mod aws;
mod baremetal;
mod docker;
mod kubeadm;

pub use aws::AwsProvider;
pub use baremetal::BareMetalProvider;
pub use docker::DockerProvider;
pub use kubeadm::KubeadmProvider;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::ProviderCategory;
use crate::manifest::CAPIManifest;
use crate::{Error, Result};

/// Infrastructure provider capability set
///
/// Implementations build provider-specific resources pre-populated with the
/// provider's default image, credential and instance type data.
pub trait InfrastructureProvider: Send + Sync + std::fmt::Debug {
    /// The variant this provider implements
    fn provider_type(&self) -> InfraProviderType;

    /// Build the infrastructure cluster resource (e.g., DockerCluster)
    fn infra_cluster(&self, name: &str, namespace: &str) -> CAPIManifest;

    /// Build one infrastructure machine resource (e.g., AWSMachine)
    fn infra_machine(&self, name: &str, namespace: &str) -> CAPIManifest;

    /// Build a reusable machine template for machine deployments
    fn infra_machine_template(&self, name: &str, namespace: &str) -> CAPIManifest;

    /// Inject provider-specific values into a bootstrap config in place
    ///
    /// The config may carry an init, a join, or a control plane join
    /// configuration. Only the populated branch is touched.
    fn set_bootstrap_config_infra_values(&self, config: &mut CAPIManifest);

    /// Inject provider-specific values into a bootstrap config template in place
    fn set_bootstrap_config_template_infra_values(&self, template: &mut CAPIManifest);

    /// Environment variable defaults describing this provider
    fn environment_variables(&self) -> BTreeMap<String, String>;
}

/// Bootstrap provider capability set
pub trait BootstrapProvider: Send + Sync + std::fmt::Debug {
    /// The variant this provider implements
    fn provider_type(&self) -> BootstrapProviderType;

    /// Build the bootstrap config for one machine
    ///
    /// The first control plane machine (`index == 0`) initializes the cluster.
    /// Later control plane machines join the control plane. Workers join as
    /// plain nodes.
    fn config(
        &self,
        name: &str,
        namespace: &str,
        is_control_plane: bool,
        index: usize,
    ) -> CAPIManifest;

    /// Build a join-only bootstrap config template for worker machine deployments
    ///
    /// Control planes are never managed by machine deployments, so templates
    /// always describe workers.
    fn config_template(&self, name: &str, namespace: &str) -> CAPIManifest;
}

// ============================================================================
// Provider Types
// ============================================================================

/// Known infrastructure provider variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InfraProviderType {
    /// Docker/Kind (CAPD)
    #[default]
    Docker,
    /// Amazon Web Services (CAPA)
    Aws,
    /// Bare metal (CAPBM)
    BareMetal,
}

#[cfg(test)]
impl InfraProviderType {
    /// All known infrastructure providers
    pub const ALL: &'static [InfraProviderType] = &[Self::Docker, Self::Aws, Self::BareMetal];
}

impl std::str::FromStr for InfraProviderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "aws" => Ok(Self::Aws),
            "baremetal" => Ok(Self::BareMetal),
            _ => Err(Error::unsupported_provider(
                ProviderCategory::Infrastructure,
                s,
            )),
        }
    }
}

impl std::fmt::Display for InfraProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Docker => write!(f, "docker"),
            Self::Aws => write!(f, "aws"),
            Self::BareMetal => write!(f, "baremetal"),
        }
    }
}

/// Known bootstrap provider variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BootstrapProviderType {
    /// Kubeadm (CABPK)
    #[default]
    Kubeadm,
}

#[cfg(test)]
impl BootstrapProviderType {
    /// All known bootstrap providers
    pub const ALL: &'static [BootstrapProviderType] = &[Self::Kubeadm];
}

impl std::str::FromStr for BootstrapProviderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "kubeadm" => Ok(Self::Kubeadm),
            _ => Err(Error::unsupported_provider(ProviderCategory::Bootstrap, s)),
        }
    }
}

impl std::fmt::Display for BootstrapProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kubeadm => write!(f, "kubeadm"),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Create an infrastructure provider instance for the given type
pub fn create_infra_provider(provider_type: InfraProviderType) -> Box<dyn InfrastructureProvider> {
    match provider_type {
        InfraProviderType::Docker => Box::new(DockerProvider::new()),
        InfraProviderType::Aws => Box::new(AwsProvider::new()),
        InfraProviderType::BareMetal => Box::new(BareMetalProvider::new()),
    }
}

/// Create a bootstrap provider instance for the given type
pub fn create_bootstrap_provider(
    provider_type: BootstrapProviderType,
) -> Box<dyn BootstrapProvider> {
    match provider_type {
        BootstrapProviderType::Kubeadm => Box::new(KubeadmProvider::new()),
    }
}

/// Resolve an infrastructure provider identifier (case-insensitive)
pub fn resolve_infra_provider(name: &str) -> Result<Box<dyn InfrastructureProvider>> {
    let provider_type: InfraProviderType = name.parse()?;
    debug!(provider = %provider_type, "resolved infrastructure provider");
    Ok(create_infra_provider(provider_type))
}

/// Resolve a bootstrap provider identifier (case-insensitive)
pub fn resolve_bootstrap_provider(name: &str) -> Result<Box<dyn BootstrapProvider>> {
    let provider_type: BootstrapProviderType = name.parse()?;
    debug!(provider = %provider_type, "resolved bootstrap provider");
    Ok(create_bootstrap_provider(provider_type))
}

// ============================================================================
// Shared Helpers for Bootstrap Mutation
// ============================================================================

/// Return the named kubeadm configuration block if it is populated
fn populated<'a>(kubeadm_spec: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    kubeadm_spec.get_mut(key).filter(|v| v.is_object())
}

/// Set node registration options on the populated init or join configuration
///
/// Init takes precedence; a kubeadm spec never carries both.
pub(crate) fn set_node_registration(kubeadm_spec: &mut Value, registration: Value) {
    if let Some(init) = populated(kubeadm_spec, "initConfiguration") {
        init["nodeRegistration"] = registration;
    } else if let Some(join) = populated(kubeadm_spec, "joinConfiguration") {
        join["nodeRegistration"] = registration;
    }
}

/// Apply a mutation to the cluster configuration if it is populated
pub(crate) fn with_cluster_configuration(kubeadm_spec: &mut Value, apply: impl FnOnce(&mut Value)) {
    if let Some(cluster_config) = populated(kubeadm_spec, "clusterConfiguration") {
        apply(cluster_config);
    }
}

/// The kubeadm spec nested inside a KubeadmConfigTemplate
pub(crate) fn template_kubeadm_spec(template: &mut CAPIManifest) -> Option<&mut Value> {
    template
        .spec
        .as_mut()
        .and_then(|spec| spec.pointer_mut("/template/spec"))
        .filter(|v| v.is_object())
}

/// Build a string map from static pairs
pub(crate) fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
