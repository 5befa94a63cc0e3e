//! CLI entry point.
//!
//! Resolves who is running the tool, builds the configuration, wires the
//! adapters via bootstrap and drives the provisioning sequence to the
//! hand-off. Every failure ends here and becomes the process exit status.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kvmac_cli::{Cli, CliConfig, CliError, CliOperator, bootstrap, presentation};
use kvmac_core::ProvisionError;

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to initialise logging")
}

async fn run() -> Result<(), CliError> {
    let identity = kvmac_runtime::detect_identity().context("Could not determine the invoking user")?;
    if !identity.elevated {
        return Err(ProvisionError::NotElevated.into());
    }

    let config = CliConfig::from_env().into_provision_config(identity)?;
    presentation::print_banner(&config);

    let operator = Arc::new(CliOperator::stdio());
    let provisioner = bootstrap(config, operator, std::io::stderr().is_terminal());

    let report = provisioner.provision().await?;
    match serde_json::to_string(&report) {
        Ok(json) => debug!(report = %json, "Provisioning report"),
        Err(e) => debug!(error = %e, "Could not serialize provisioning report"),
    }
    presentation::print_report(&report);

    let variant = provisioner.launch().await?;
    debug!(script = variant.file_name, "Boot script returned");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("{} {e:#}", style("warning:").yellow().bold());
    }

    let _cli = Cli::parse();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
