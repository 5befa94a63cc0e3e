//! Debian package database adapter (`dpkg-query` and `apt-get`).

use async_trait::async_trait;
use kvmac_core::ToolError;
use kvmac_core::ports::PackageManager;
use tracing::info;

use crate::command::{command, run_attached, run_probe};

/// Package manager backed by dpkg and apt.
#[derive(Debug, Default, Clone)]
pub struct AptPackageManager;

impl AptPackageManager {
    pub const fn new() -> Self {
        Self
    }
}

/// True when a `dpkg-query -W --showformat=${Status}` line says the package is installed.
pub fn status_is_installed(status: &str) -> bool {
    let mut words = status.split_whitespace();
    matches!(
        (words.next(), words.next(), words.next()),
        (Some("install"), Some("ok"), Some("installed"))
    )
}

#[async_trait]
impl PackageManager for AptPackageManager {
    async fn is_installed(&self, package: &str) -> Result<bool, ToolError> {
        let cmd = command("dpkg-query", ["-W", "--showformat=${Status}", package]);
        let (status, stdout) = run_probe("dpkg-query", cmd).await?;

        // dpkg-query exits 1 for packages it has never heard of.
        Ok(status.success() && status_is_installed(&stdout))
    }

    async fn refresh_index(&self) -> Result<(), ToolError> {
        info!("Refreshing package index");
        run_attached("apt-get", command("apt-get", ["update"])).await
    }

    async fn install(&self, packages: &[String]) -> Result<(), ToolError> {
        info!(?packages, "Installing packages");
        let mut cmd = command("apt-get", ["install", "-y"]);
        cmd.args(packages);
        run_attached("apt-get", cmd).await
    }
}
