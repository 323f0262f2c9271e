//! Command line interface

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;

use crate::generate::{run_generate, GenerateOptions};
use crate::provider::resolve_infra_provider;
use crate::{
    Result, DEFAULT_BOOTSTRAP_PROVIDER, DEFAULT_CLUSTER_NAME, DEFAULT_CONTROL_PLANE_COUNT,
    DEFAULT_INFRASTRUCTURE_PROVIDER, DEFAULT_K8S_VERSION, DEFAULT_NAMESPACE, DEFAULT_WORKER_COUNT,
};

/// Devtool to help with YAML for CAPI and CAPI providers
#[derive(Parser, Debug)]
#[command(name = "capi-yaml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate YAML for CAPI and its providers
    Generate(GenerateArgs),
    /// Print the environment variable defaults of an infrastructure provider
    Env(EnvArgs),
}

/// Arguments of the `generate` command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Name for the cluster
    #[arg(short = 'c', long, default_value = DEFAULT_CLUSTER_NAME)]
    pub cluster_name: String,

    /// Namespace where the cluster will be created
    #[arg(short = 'n', long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Infrastructure provider for the cluster
    #[arg(short = 'i', long, default_value = DEFAULT_INFRASTRUCTURE_PROVIDER)]
    pub infrastructure_provider: String,

    /// Bootstrap provider for the cluster
    #[arg(
        short = 'b',
        long,
        alias = "boostrap-provider",
        default_value = DEFAULT_BOOTSTRAP_PROVIDER
    )]
    pub bootstrap_provider: String,

    /// Version of kubernetes for the cluster
    #[arg(short = 'k', long, default_value = DEFAULT_K8S_VERSION)]
    pub k8s_version: String,

    /// Generate a machine deployment instead of individual worker machines
    #[arg(
        short = 'd',
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub generate_machine_deployment: bool,

    /// Number of control plane machines in the cluster
    #[arg(short = 'm', long, default_value_t = DEFAULT_CONTROL_PLANE_COUNT)]
    pub control_plane_count: usize,

    /// Number of worker machines in the cluster
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub worker_count: usize,

    /// Write the manifests to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl From<&GenerateArgs> for GenerateOptions {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            infra_provider: args.infrastructure_provider.clone(),
            bootstrap_provider: args.bootstrap_provider.clone(),
            cluster_name: args.cluster_name.clone(),
            cluster_namespace: args.namespace.clone(),
            k8s_version: args.k8s_version.clone(),
            machine_deployment: args.generate_machine_deployment,
            control_plane_machine_count: args.control_plane_count,
            worker_machine_count: args.worker_count,
        }
    }
}

/// Arguments of the `env` command
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Infrastructure provider to describe
    #[arg(short = 'i', long, default_value = DEFAULT_INFRASTRUCTURE_PROVIDER)]
    pub infrastructure_provider: String,
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Generate(args) => generate(&args),
            Commands::Env(args) => env(&args, &mut std::io::stdout().lock()),
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let opts = GenerateOptions::from(args);
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            run_generate(&opts, &mut out)?;
            info!(path = %path.display(), "wrote manifests");
            Ok(())
        }
        None => run_generate(&opts, &mut std::io::stdout().lock()),
    }
}

fn env<W: Write>(args: &EnvArgs, out: &mut W) -> Result<()> {
    let provider = resolve_infra_provider(&args.infrastructure_provider)?;
    for (name, value) in provider.environment_variables() {
        writeln!(out, "{name}={value}")?;
    }
    Ok(())
}
