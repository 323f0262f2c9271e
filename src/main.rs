//! capi-yaml - generate Cluster API manifests

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use capi_yaml_gen::cli::Cli;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the YAML stream
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    cli.run()?;
    Ok(())
}
