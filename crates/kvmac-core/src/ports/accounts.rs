//! User account port.

use async_trait::async_trait;

use super::ToolError;

/// Read and extend a user's supplementary group memberships.
///
/// Memberships are only ever added.
#[async_trait]
pub trait AccountManager: Send + Sync {
    /// Names of every group `user` currently belongs to.
    async fn groups_of(&self, user: &str) -> Result<Vec<String>, ToolError>;

    /// Add `user` to `group`. Adding an existing membership must succeed.
    async fn add_to_group(&self, user: &str, group: &str) -> Result<(), ToolError>;
}
