//! Dependency checker - installs only the packages that are missing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DependencyOutcome, PackageRequirement, missing_packages};
use crate::error::ProvisionError;
use crate::ports::{Operator, PackageManager};

/// Service converging the host's installed package set.
pub struct DependencyChecker {
    packages: Arc<dyn PackageManager>,
    operator: Arc<dyn Operator>,
}

impl DependencyChecker {
    pub fn new(packages: Arc<dyn PackageManager>, operator: Arc<dyn Operator>) -> Self {
        Self { packages, operator }
    }

    /// Query the package database for each requirement, in order.
    ///
    /// A package whose status cannot be queried is treated as missing, so the
    /// install request covers it.
    pub async fn query(&self, required: &[String]) -> Vec<PackageRequirement> {
        let mut requirements = Vec::with_capacity(required.len());
        for name in required {
            let installed = match self.packages.is_installed(name).await {
                Ok(installed) => installed,
                Err(e) => {
                    warn!(package = %name, error = %e, "Package query failed, treating as missing");
                    false
                }
            };
            debug!(package = %name, installed, "Queried package");
            requirements.push(PackageRequirement::new(name.clone(), installed));
        }
        requirements
    }

    /// Install whatever is missing from `required` in one batch.
    ///
    /// Index refresh and install failures are fatal and not retried.
    pub async fn ensure(&self, required: &[String]) -> Result<DependencyOutcome, ProvisionError> {
        self.operator.info("Checking required packages...");

        let requirements = self.query(required).await;
        let missing = missing_packages(&requirements);

        if missing.is_empty() {
            info!("All {} required packages are installed", required.len());
            self.operator.info("✓ All required packages are installed");
            return Ok(DependencyOutcome::AllSatisfied);
        }

        self.operator
            .info(&format!("Installing missing packages: {}", missing.join(", ")));

        self.packages
            .refresh_index()
            .await
            .map_err(ProvisionError::DependencyInstall)?;
        self.packages
            .install(&missing)
            .await
            .map_err(ProvisionError::DependencyInstall)?;

        info!(packages = ?missing, "Installed missing packages");
        self.operator.info("✓ Packages installed");
        Ok(DependencyOutcome::Installed(missing))
    }
}
