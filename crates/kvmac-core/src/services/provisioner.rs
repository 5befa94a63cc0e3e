//! `Provisioner` - the provisioning facade.
//!
//! Runs the seven steps strictly in order: dependencies, toolkit sync, KVM
//! profile, group membership, disk images, boot script resources, launch.
//! Each step checks the host's current state first and only acts on what is
//! missing, so a second run against a converged host changes nothing.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use super::{
    AssetPipeline, DependencyChecker, GroupManager, HostConfigurator, Launcher,
    RepositorySynchronizer, ResourceCustomizer,
};
use crate::config::{ProvisionConfig, validate_config};
use crate::domain::{BootVariant, ProvisionReport};
use crate::error::ProvisionError;
use crate::ports::{Operator, Ports};

/// The core provisioning facade.
///
/// Constructed at the adapter's composition root with a validated
/// configuration and concrete ports.
///
/// # Example
///
/// ```ignore
/// let provisioner = Provisioner::new(config, ports);
/// let report = provisioner.provision().await?;
/// provisioner.launch().await?;
/// ```
pub struct Provisioner {
    config: ProvisionConfig,
    dependencies: DependencyChecker,
    repository: RepositorySynchronizer,
    host: HostConfigurator,
    groups: GroupManager,
    assets: AssetPipeline,
    resources: ResourceCustomizer,
    launcher: Launcher,
    operator: Arc<dyn Operator>,
}

impl Provisioner {
    pub fn new(config: ProvisionConfig, ports: Ports) -> Self {
        Self {
            config,
            dependencies: DependencyChecker::new(ports.packages, ports.operator.clone()),
            repository: RepositorySynchronizer::new(ports.vcs, ports.operator.clone()),
            host: HostConfigurator::new(ports.operator.clone()),
            groups: GroupManager::new(ports.accounts, ports.operator.clone()),
            assets: AssetPipeline::new(
                ports.fetcher,
                ports.converter,
                ports.disk_builder,
                ports.operator.clone(),
            ),
            resources: ResourceCustomizer::new(ports.operator.clone()),
            launcher: Launcher::new(ports.launcher, ports.operator.clone()),
            operator: ports.operator,
        }
    }

    pub const fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Converge the host (steps 1 to 6).
    ///
    /// Fails fast on missing privileges, invalid configuration, failed
    /// dependency installation, a failed initial clone, a missing toolkit
    /// directory or an invalid vendor choice. All other failures are
    /// recorded in the report.
    #[instrument(skip(self), fields(user = %self.config.identity.invoking_user))]
    pub async fn provision(&self) -> Result<ProvisionReport, ProvisionError> {
        if !self.config.identity.elevated {
            return Err(ProvisionError::NotElevated);
        }
        validate_config(&self.config)?;

        let config = &self.config;

        self.step(1, "Checking dependencies");
        let dependencies = self.dependencies.ensure(&config.packages).await?;

        self.step(2, "Synchronizing the toolkit");
        let repository = self
            .repository
            .sync(&config.repo_url, &config.branch, &config.toolkit_dir)
            .await?;
        ensure_toolkit_dir(&config.toolkit_dir)?;

        self.step(3, "Configuring KVM");
        let host_config = self.host.ensure(config)?;

        self.step(4, "Checking group membership");
        let groups = self
            .groups
            .ensure(&config.identity.invoking_user, &config.groups)
            .await;

        self.step(5, "Preparing disk images");
        let assets = self.assets.ensure(config).await?;

        self.step(6, "Reviewing VM resources");
        let resources = self.resources.customize(&config.toolkit_dir)?;

        let report = ProvisionReport {
            dependencies,
            repository,
            host_config,
            groups,
            assets,
            resources,
        };
        info!(converged = report.is_converged(), "Provisioning finished");
        Ok(report)
    }

    /// Select a boot variant and hand off to it (step 7).
    pub async fn launch(&self) -> Result<BootVariant, ProvisionError> {
        ensure_toolkit_dir(&self.config.toolkit_dir)?;
        self.step(7, "Launching");
        self.launcher.launch(&self.config.toolkit_dir).await
    }

    /// Provision, then launch.
    pub async fn run(&self) -> Result<(ProvisionReport, BootVariant), ProvisionError> {
        let report = self.provision().await?;
        for line in report.summary_lines() {
            self.operator.info(&line);
        }
        let variant = self.launch().await?;
        Ok((report, variant))
    }

    fn step(&self, number: u8, title: &str) {
        info!(step = number, "{title}");
        self.operator.info(&format!("[{number}/7] {title}"));
    }
}

fn ensure_toolkit_dir(path: &Path) -> Result<(), ProvisionError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ProvisionError::ToolkitUnavailable {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) => Err(ProvisionError::ToolkitUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
