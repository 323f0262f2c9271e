//! Untyped Kubernetes resource records
//!
//! Every resource the generator emits (Cluster, Machine, KubeadmConfig,
//! DockerMachine, ...) is a [`CAPIManifest`]: API version, kind, metadata and
//! a kind-specific spec payload. Cross-object linkage is expressed through
//! [`ObjectReference`]s built from already-constructed manifests.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ObjectReference;
use serde::{Deserialize, Serialize};

/// A CAPI manifest represented as an untyped Kubernetes resource
///
/// This struct holds a generic Kubernetes manifest with its API version,
/// kind, metadata, and spec. The status payload is never populated by the
/// generator and is always dropped by the serializer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CAPIManifest {
    /// API version (e.g., "cluster.x-k8s.io/v1alpha3")
    pub api_version: String,
    /// Kind of resource (e.g., "Cluster", "MachineDeployment")
    pub kind: String,
    /// Resource metadata
    pub metadata: ManifestMetadata,
    /// Resource spec (untyped)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<serde_json::Value>,
    /// Observed state; encoded as `status: null` when unset
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

/// Metadata for a CAPI manifest
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ManifestMetadata {
    /// Name of the resource
    pub name: String,
    /// Namespace (optional for cluster-scoped resources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl CAPIManifest {
    /// Create a new CAPI manifest
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: ManifestMetadata {
                name: name.into(),
                namespace: Some(namespace.into()),
                labels: None,
            },
            spec: None,
            status: None,
        }
    }

    /// Set the spec for this manifest
    pub fn with_spec(mut self, spec: serde_json::Value) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Add labels to the manifest
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.metadata.labels = Some(labels);
        self
    }

    /// Name of the resource
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace of the resource, empty when cluster-scoped
    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// Mutable access to the spec, creating an empty object if unset
    pub fn spec_mut(&mut self) -> &mut serde_json::Value {
        self.spec.get_or_insert_with(|| serde_json::json!({}))
    }

    /// Build a reference pointing at this manifest
    pub fn object_ref(&self) -> ObjectReference {
        ObjectReference {
            api_version: Some(self.api_version.clone()),
            kind: Some(self.kind.clone()),
            name: Some(self.metadata.name.clone()),
            namespace: self.metadata.namespace.clone(),
            ..Default::default()
        }
    }
}
