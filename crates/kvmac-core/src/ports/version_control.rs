//! Version-control port for the toolkit checkout.

use async_trait::async_trait;
use std::path::Path;

use super::ToolError;

/// Git operations needed to keep a single checkout current.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Shallow, recursive clone of `branch` from `url` into `dest`.
    async fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<(), ToolError>;

    /// Fetch `branch` from the remote without merging.
    async fn fetch(&self, repo: &Path, branch: &str) -> Result<(), ToolError>;

    /// Commit id of the local branch tip.
    async fn head_commit(&self, repo: &Path) -> Result<String, ToolError>;

    /// Commit id of the fetched remote tip of `branch`.
    async fn remote_commit(&self, repo: &Path, branch: &str) -> Result<String, ToolError>;

    /// Pull `branch`, updating nested submodules as well.
    async fn pull(&self, repo: &Path, branch: &str) -> Result<(), ToolError>;
}
