//! Boot script hand-off port.

use async_trait::async_trait;
use std::path::Path;

use super::ToolError;

/// Hands control over to an external boot script.
///
/// The orchestrator's job ends at a successful hand-off; implementations do
/// not supervise or restart the launched process. A real implementation may
/// replace the current process and never return on success.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn hand_off(&self, script: &Path, working_dir: &Path) -> Result<(), ToolError>;
}
