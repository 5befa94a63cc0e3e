//! Repository synchronizer - keeps the toolkit checkout current.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{RepositoryState, SyncOutcome};
use crate::error::ProvisionError;
use crate::ports::{Operator, ToolError, VersionControl};

/// Service converging the local toolkit checkout with its remote.
pub struct RepositorySynchronizer {
    vcs: Arc<dyn VersionControl>,
    operator: Arc<dyn Operator>,
}

impl RepositorySynchronizer {
    pub fn new(vcs: Arc<dyn VersionControl>, operator: Arc<dyn Operator>) -> Self {
        Self { vcs, operator }
    }

    /// Clone `url` into `path` if absent, otherwise bring it up to date.
    ///
    /// A failed clone is fatal. A failed fetch or pull is reported and the
    /// existing checkout is used as-is.
    pub async fn sync(
        &self,
        url: &str,
        branch: &str,
        path: &Path,
    ) -> Result<SyncOutcome, ProvisionError> {
        let state = RepositoryState::inspect(path);

        if !state.present {
            self.operator
                .info(&format!("Cloning {url} into {}...", path.display()));
            self.vcs
                .clone_shallow(url, branch, path)
                .await
                .map_err(ProvisionError::Clone)?;
            info!(path = %path.display(), "Cloned toolkit repository");
            self.operator.info("✓ Repository cloned");
            return Ok(SyncOutcome::Cloned);
        }

        match self.refresh(state, branch).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %e, "Toolkit update failed, continuing with local checkout");
                self.operator.warn(&format!(
                    "Could not update the toolkit ({e}); continuing with the existing checkout"
                ));
                Ok(SyncOutcome::Stale {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn refresh(&self, state: RepositoryState, branch: &str) -> Result<SyncOutcome, ToolError> {
        let path = state.path.clone();
        self.operator.info("Checking for toolkit updates...");

        self.vcs.fetch(&path, branch).await?;
        let local = self.vcs.head_commit(&path).await?;
        let remote = self.vcs.remote_commit(&path, branch).await?;

        let state = state.with_commits(local.clone(), remote.clone());
        if state.is_up_to_date() {
            info!(commit = %short(&local), "Toolkit is up to date");
            self.operator.info("✓ Toolkit is up to date");
            return Ok(SyncOutcome::UpToDate);
        }

        self.operator.info(&format!(
            "Updating toolkit {} -> {}...",
            short(&local),
            short(&remote)
        ));
        self.vcs.pull(&path, branch).await?;
        self.operator.info("✓ Toolkit updated");

        Ok(SyncOutcome::Updated {
            from: short(&local).to_string(),
            to: short(&remote).to_string(),
        })
    }
}

fn short(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}
