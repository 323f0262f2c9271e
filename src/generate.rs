//! Manifest generation
//!
//! [`generate_manifests`] resolves the requested providers and builds the
//! ordered manifest list for a cluster:
//!
//! 1. Infrastructure cluster, then the core Cluster referencing it
//! 2. Control plane machines, always one resource set per machine
//! 3. Workers, either one resource set per machine or a single
//!    MachineDeployment when machine deployments are enabled
//!
//! Every machine emits `[infra machine, Machine, bootstrap config]` in that
//! order so a Machine never precedes the infrastructure machine it references.

use std::io::Write;

use tracing::{debug, info};

use crate::capi::{
    bootstrap_config_name, generate_cluster, generate_machine, generate_machine_deployment,
    machine_deployment_name, machine_name, ClusterConfig, MachineRole,
};
use crate::manifest::CAPIManifest;
use crate::provider::{
    resolve_bootstrap_provider, resolve_infra_provider, BootstrapProvider, InfrastructureProvider,
};
use crate::serialize::Scheme;
use crate::{
    Error, Result, DEFAULT_BOOTSTRAP_PROVIDER, DEFAULT_CLUSTER_NAME, DEFAULT_CONTROL_PLANE_COUNT,
    DEFAULT_INFRASTRUCTURE_PROVIDER, DEFAULT_K8S_VERSION, DEFAULT_NAMESPACE, DEFAULT_WORKER_COUNT,
};

/// Options for one generation run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Infrastructure provider identifier (docker, aws, baremetal)
    pub infra_provider: String,
    /// Bootstrap provider identifier (kubeadm)
    pub bootstrap_provider: String,
    /// Name of the cluster
    pub cluster_name: String,
    /// Namespace all resources are created in
    pub cluster_namespace: String,
    /// Kubernetes version for every machine
    pub k8s_version: String,
    /// Emit workers as a MachineDeployment instead of individual machines
    pub machine_deployment: bool,
    /// Number of control plane machines
    pub control_plane_machine_count: usize,
    /// Number of worker machines
    pub worker_machine_count: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            infra_provider: DEFAULT_INFRASTRUCTURE_PROVIDER.to_string(),
            bootstrap_provider: DEFAULT_BOOTSTRAP_PROVIDER.to_string(),
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            cluster_namespace: DEFAULT_NAMESPACE.to_string(),
            k8s_version: DEFAULT_K8S_VERSION.to_string(),
            machine_deployment: true,
            control_plane_machine_count: DEFAULT_CONTROL_PLANE_COUNT,
            worker_machine_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// Everything needed to build the machines of one role
struct MachineSet<'a> {
    role: MachineRole,
    count: usize,
    infra: &'a dyn InfrastructureProvider,
    bootstrap: &'a dyn BootstrapProvider,
    cluster: ClusterConfig<'a>,
}

impl MachineSet<'_> {
    /// One infra machine, Machine and bootstrap config per instance
    fn expanded(&self) -> Vec<CAPIManifest> {
        let mut out = Vec::new();
        for index in 0..self.count {
            let name = machine_name(self.role.name_prefix(), index);
            let config_name = bootstrap_config_name(&name);

            let mut config = self.bootstrap.config(
                &config_name,
                self.cluster.namespace,
                self.role.is_control_plane(),
                index,
            );
            let infra_machine = self.infra.infra_machine(&name, self.cluster.namespace);
            self.infra.set_bootstrap_config_infra_values(&mut config);

            let machine = generate_machine(&self.cluster, &name, self.role, &config, &infra_machine);
            debug!(machine = %name, role = ?self.role, "built machine");

            out.push(infra_machine);
            out.push(machine);
            out.push(config);
        }
        out
    }

    /// Shared machine template, config template and MachineDeployment
    fn templated(&self, replicas: i32) -> Vec<CAPIManifest> {
        let name = machine_deployment_name(self.role.name_prefix());

        let machine_template = self.infra.infra_machine_template(&name, self.cluster.namespace);
        let mut config_template = self.bootstrap.config_template(&name, self.cluster.namespace);
        self.infra
            .set_bootstrap_config_template_infra_values(&mut config_template);

        let deployment = generate_machine_deployment(
            &self.cluster,
            &name,
            replicas,
            &machine_template,
            &config_template,
        );
        debug!(deployment = %name, replicas, "built machine deployment");

        vec![machine_template, config_template, deployment]
    }
}

/// Build the ordered manifest list for the given options
///
/// Provider identifiers are resolved before anything is built, so an unknown
/// provider fails the run with no manifests.
pub fn generate_manifests(opts: &GenerateOptions) -> Result<Vec<CAPIManifest>> {
    let infra = resolve_infra_provider(&opts.infra_provider)?;
    let bootstrap = resolve_bootstrap_provider(&opts.bootstrap_provider)?;

    let worker_replicas = if opts.machine_deployment {
        Some(i32::try_from(opts.worker_machine_count).map_err(|_| {
            Error::validation(format!(
                "worker count {} exceeds the maximum machine deployment replicas ({})",
                opts.worker_machine_count,
                i32::MAX
            ))
        })?)
    } else {
        None
    };

    let cluster = ClusterConfig {
        name: &opts.cluster_name,
        namespace: &opts.cluster_namespace,
        k8s_version: &opts.k8s_version,
    };

    let infra_cluster = infra.infra_cluster(cluster.name, cluster.namespace);
    let core_cluster = generate_cluster(&cluster, &infra_cluster);

    let control_planes = MachineSet {
        role: MachineRole::ControlPlane,
        count: opts.control_plane_machine_count,
        infra: infra.as_ref(),
        bootstrap: bootstrap.as_ref(),
        cluster,
    };
    let workers = MachineSet {
        role: MachineRole::Worker,
        count: opts.worker_machine_count,
        ..control_planes
    };

    let mut manifests = vec![infra_cluster, core_cluster];
    // Control planes are never managed by a MachineDeployment
    manifests.extend(control_planes.expanded());
    match worker_replicas {
        Some(replicas) => manifests.extend(workers.templated(replicas)),
        None => manifests.extend(workers.expanded()),
    }

    info!(
        cluster = %opts.cluster_name,
        infra = %infra.provider_type(),
        bootstrap = %bootstrap.provider_type(),
        manifests = manifests.len(),
        "generated cluster manifests"
    );
    Ok(manifests)
}

/// Generate manifests and write them as a YAML stream to `out`
pub fn run_generate<W: Write>(opts: &GenerateOptions, out: &mut W) -> Result<()> {
    let manifests = generate_manifests(opts)?;
    Scheme::with_defaults().write_all(&manifests, out)
}
