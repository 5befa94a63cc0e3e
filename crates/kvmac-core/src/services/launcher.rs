//! Launcher - picks a boot variant and hands control to its script.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{BOOT_VARIANTS, BootVariant};
use crate::error::ProvisionError;
use crate::ports::{Operator, OperatorResult, ProcessLauncher};

/// Map a menu answer to a boot variant index.
///
/// Answers are 1-based. Anything that is not a number in `1..=count`
/// falls back to the first entry.
pub fn resolve_selection(input: &str, count: usize) -> usize {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=count).contains(choice))
        .map_or(0, |choice| choice - 1)
}

/// Service performing the final hand-off to a boot script.
pub struct Launcher {
    launcher: Arc<dyn ProcessLauncher>,
    operator: Arc<dyn Operator>,
}

impl Launcher {
    pub fn new(launcher: Arc<dyn ProcessLauncher>, operator: Arc<dyn Operator>) -> Self {
        Self { launcher, operator }
    }

    /// Show the numbered menu and read the operator's pick.
    pub fn select(&self) -> OperatorResult<BootVariant> {
        self.operator.info("Available boot configurations:");
        for (number, variant) in BOOT_VARIANTS.iter().enumerate() {
            self.operator.info(&format!(
                "  {}. {} ({})",
                number + 1,
                variant.file_name,
                variant.description
            ));
        }

        let answer = self.operator.text("Boot configuration", Some("1"))?;
        let index = resolve_selection(&answer, BOOT_VARIANTS.len());
        debug!(answer = %answer, index, "Resolved boot selection");
        Ok(BOOT_VARIANTS[index])
    }

    /// Select a variant, mark its script executable and hand off to it.
    pub async fn launch(&self, toolkit_dir: &Path) -> Result<BootVariant, ProvisionError> {
        let variant = self.select()?;
        let script = toolkit_dir.join(variant.file_name);

        grant_execute(&script)?;

        info!(script = %script.display(), "Handing off to boot script");
        self.operator
            .info(&format!("Starting {}...", variant.file_name));
        self.launcher
            .hand_off(&script, toolkit_dir)
            .await
            .map_err(|source| ProvisionError::Launch {
                script: script.clone(),
                source,
            })?;

        Ok(variant)
    }
}

/// Add execute permission for everyone who can read the script.
#[cfg(unix)]
fn grant_execute(script: &Path) -> Result<(), ProvisionError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(script).map_err(|e| launch_io(script, e))?;
    let mut perms = metadata.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(script, perms).map_err(|e| launch_io(script, e))
}

#[cfg(not(unix))]
fn grant_execute(script: &Path) -> Result<(), ProvisionError> {
    fs::metadata(script)
        .map(|_| ())
        .map_err(|e| launch_io(script, e))
}

fn launch_io(script: &Path, source: std::io::Error) -> ProvisionError {
    ProvisionError::io(PathBuf::from(script), source)
}
