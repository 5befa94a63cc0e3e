//! Boot script hand-off.

use std::path::Path;

use async_trait::async_trait;
use kvmac_core::ToolError;
use kvmac_core::ports::ProcessLauncher;
use tracing::info;

/// Replaces the current process with the boot script.
///
/// On success `hand_off` never returns: the script inherits the terminal and
/// the process id. An error means the script could not be executed.
#[derive(Debug, Clone, Default)]
pub struct ExecLauncher;

#[async_trait]
impl ProcessLauncher for ExecLauncher {
    #[cfg(unix)]
    async fn hand_off(&self, script: &Path, working_dir: &Path) -> Result<(), ToolError> {
        use std::os::unix::process::CommandExt;

        info!(script = %script.display(), "exec");
        let err = std::process::Command::new(script)
            .current_dir(working_dir)
            .exec();
        Err(ToolError::spawn_failed(script.display().to_string(), err))
    }

    #[cfg(not(unix))]
    async fn hand_off(&self, script: &Path, working_dir: &Path) -> Result<(), ToolError> {
        info!(script = %script.display(), "spawn");
        let status = std::process::Command::new(script)
            .current_dir(working_dir)
            .status()
            .map_err(|e| ToolError::spawn_failed(script.display().to_string(), e))?;
        if status.success() {
            Ok(())
        } else {
            Err(ToolError::failed(
                script.display().to_string(),
                status.code(),
                "boot script failed",
            ))
        }
    }
}
