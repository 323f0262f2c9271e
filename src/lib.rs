//! capi-yaml-gen - Cluster API manifest generator
//!
//! Given a cluster name, namespace, provider choices, Kubernetes version and
//! machine counts, builds the ordered set of Cluster API resources describing
//! the cluster and serializes them to a multi-document YAML stream.
//!
//! # Modules
//!
//! - [`manifest`] - Untyped resource records and object references
//! - [`provider`] - Infrastructure and bootstrap provider abstractions
//! - [`capi`] - Provider-agnostic Cluster, Machine and MachineDeployment builders
//! - [`generate`] - Generation options and orchestration
//! - [`serialize`] - Type scheme and YAML encoding
//! - [`cli`] - Command line interface
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod capi;
pub mod cli;
pub mod constants;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod provider;
pub mod serialize;

pub use error::Error;
pub use generate::{generate_manifests, run_generate, GenerateOptions};
pub use manifest::CAPIManifest;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Default Configuration Constants
// =============================================================================
// Shared by the CLI flag defaults and `GenerateOptions::default()`.

/// Default cluster name
pub const DEFAULT_CLUSTER_NAME: &str = "my-cluster";

/// Default namespace for generated resources
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default infrastructure provider
pub const DEFAULT_INFRASTRUCTURE_PROVIDER: &str = "docker";

/// Default bootstrap provider
pub const DEFAULT_BOOTSTRAP_PROVIDER: &str = "kubeadm";

/// Default Kubernetes version
pub const DEFAULT_K8S_VERSION: &str = "v1.15.3";

/// Default number of control plane machines
pub const DEFAULT_CONTROL_PLANE_COUNT: usize = 1;

/// Default number of worker machines
pub const DEFAULT_WORKER_COUNT: usize = 1;
