//! OS package manager port.

use async_trait::async_trait;

use super::ToolError;

/// Query and install OS packages.
///
/// Implementations talk to the distribution's package database (dpkg/apt on
/// Debian-like hosts). A package the database does not know about counts as
/// not installed rather than as an error.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Whether `package` is currently installed.
    async fn is_installed(&self, package: &str) -> Result<bool, ToolError>;

    /// Refresh the package index before installing.
    async fn refresh_index(&self) -> Result<(), ToolError>;

    /// Install exactly `packages` in one request.
    async fn install(&self, packages: &[String]) -> Result<(), ToolError>;
}
