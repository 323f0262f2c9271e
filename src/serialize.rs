//! Manifest serialization
//!
//! Manifests are encoded to YAML through a structured intermediate: each
//! record becomes a [`serde_yaml::Value`], its top-level `status` key is
//! removed, and only then is the value rendered to text. Nothing is ever
//! truncated textually, so a `status:` line nested inside a spec survives
//! untouched.
//!
//! A [`Scheme`] lists the (apiVersion, kind) pairs the generator knows how to
//! emit. Encoding a manifest whose type is not registered fails instead of
//! silently rewriting its API version or kind.

use std::collections::BTreeSet;
use std::io::Write;

use tracing::debug;

use crate::constants::{
    AWS_CLUSTER_KIND, AWS_INFRASTRUCTURE_API_VERSION, AWS_MACHINE_KIND, AWS_MACHINE_TEMPLATE_KIND,
    BAREMETAL_CLUSTER_KIND, BAREMETAL_INFRASTRUCTURE_API_VERSION, BAREMETAL_MACHINE_KIND,
    BAREMETAL_MACHINE_TEMPLATE_KIND, CAPI_CLUSTER_API_VERSION, CLUSTER_KIND,
    DOCKER_CLUSTER_KIND, DOCKER_INFRASTRUCTURE_API_VERSION, DOCKER_MACHINE_KIND,
    DOCKER_MACHINE_TEMPLATE_KIND, KUBEADM_BOOTSTRAP_API_VERSION, KUBEADM_CONFIG_KIND,
    KUBEADM_CONFIG_TEMPLATE_KIND, MACHINE_DEPLOYMENT_KIND, MACHINE_KIND, YAML_SEPARATOR,
};
use crate::manifest::CAPIManifest;
use crate::{Error, Result};

/// Top-level key dropped from every encoded manifest
const STATUS_KEY: &str = "status";

/// Registry of manifest types the serializer accepts
#[derive(Clone, Debug, Default)]
pub struct Scheme {
    types: BTreeSet<(String, String)>,
}

impl Scheme {
    /// Create an empty scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an (apiVersion, kind) pair
    pub fn register(&mut self, api_version: impl Into<String>, kind: impl Into<String>) {
        self.types.insert((api_version.into(), kind.into()));
    }

    /// Whether the (apiVersion, kind) pair is registered
    pub fn recognizes(&self, api_version: &str, kind: &str) -> bool {
        self.types
            .contains(&(api_version.to_string(), kind.to_string()))
    }

    /// Scheme covering core CAPI, kubeadm bootstrap and every infrastructure provider
    pub fn with_defaults() -> Self {
        let mut scheme = Self::new();
        for kind in [CLUSTER_KIND, MACHINE_KIND, MACHINE_DEPLOYMENT_KIND] {
            scheme.register(CAPI_CLUSTER_API_VERSION, kind);
        }
        for kind in [KUBEADM_CONFIG_KIND, KUBEADM_CONFIG_TEMPLATE_KIND] {
            scheme.register(KUBEADM_BOOTSTRAP_API_VERSION, kind);
        }
        for kind in [
            DOCKER_CLUSTER_KIND,
            DOCKER_MACHINE_KIND,
            DOCKER_MACHINE_TEMPLATE_KIND,
        ] {
            scheme.register(DOCKER_INFRASTRUCTURE_API_VERSION, kind);
        }
        for kind in [AWS_CLUSTER_KIND, AWS_MACHINE_KIND, AWS_MACHINE_TEMPLATE_KIND] {
            scheme.register(AWS_INFRASTRUCTURE_API_VERSION, kind);
        }
        for kind in [
            BAREMETAL_CLUSTER_KIND,
            BAREMETAL_MACHINE_KIND,
            BAREMETAL_MACHINE_TEMPLATE_KIND,
        ] {
            scheme.register(BAREMETAL_INFRASTRUCTURE_API_VERSION, kind);
        }
        scheme
    }

    /// Encode one manifest to YAML with its status removed
    pub fn marshal_to_yaml(&self, manifest: &CAPIManifest) -> Result<String> {
        if !self.recognizes(&manifest.api_version, &manifest.kind) {
            return Err(Error::unregistered_kind(
                &manifest.api_version,
                &manifest.kind,
                manifest.name(),
            ));
        }

        let encode_err = |e: serde_yaml::Error| {
            Error::serialization(&manifest.kind, manifest.name(), e.to_string())
        };

        let mut value = serde_yaml::to_value(manifest).map_err(encode_err)?;
        strip_status(&mut value);
        serde_yaml::to_string(&value).map_err(encode_err)
    }

    /// Render manifests as a separator-delimited YAML stream
    ///
    /// Every manifest is encoded before anything is returned, so a single
    /// failing manifest yields an error and no partial document.
    pub fn render(&self, manifests: &[CAPIManifest]) -> Result<String> {
        let mut out = String::new();
        for manifest in manifests {
            let yaml = self.marshal_to_yaml(manifest)?;
            debug!(kind = %manifest.kind, name = %manifest.name(), "encoded manifest");
            out.push_str(YAML_SEPARATOR);
            out.push('\n');
            out.push_str(&yaml);
            out.push('\n');
        }
        Ok(out)
    }

    /// Render manifests and write the stream to `out` in one pass
    pub fn write_all<W: Write>(&self, manifests: &[CAPIManifest], out: &mut W) -> Result<()> {
        let document = self.render(manifests)?;
        out.write_all(document.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Drop the top-level status key of an encoded manifest
fn strip_status(value: &mut serde_yaml::Value) {
    if let Some(mapping) = value.as_mapping_mut() {
        mapping.remove(STATUS_KEY);
    }
}
