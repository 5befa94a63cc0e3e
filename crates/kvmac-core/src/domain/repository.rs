//! Toolkit checkout state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory whose presence marks a git working copy.
pub const REPOSITORY_MARKER: &str = ".git";

/// Observed state of the local toolkit checkout.
///
/// Commit ids are only meaningful when `present` is true; a missing checkout
/// has to be cloned before any other repository operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub path: PathBuf,
    pub present: bool,
    pub local_commit: Option<String>,
    pub remote_commit: Option<String>,
}

impl RepositoryState {
    /// Inspect `path` for a repository marker. Commit ids are left unset.
    pub fn inspect(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            present: path.join(REPOSITORY_MARKER).exists(),
            local_commit: None,
            remote_commit: None,
        }
    }

    #[must_use]
    pub fn with_commits(mut self, local: impl Into<String>, remote: impl Into<String>) -> Self {
        self.local_commit = Some(local.into());
        self.remote_commit = Some(remote.into());
        self
    }

    /// True when both tips are known and identical.
    pub fn is_up_to_date(&self) -> bool {
        match (&self.local_commit, &self.remote_commit) {
            (Some(local), Some(remote)) => self.present && local == remote,
            _ => false,
        }
    }
}

/// Result of synchronizing the toolkit checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyncOutcome {
    /// No checkout existed; a fresh shallow clone was made.
    Cloned,
    /// Local tip already matched the remote tip.
    UpToDate,
    /// Local tip differed and a pull brought it level.
    Updated { from: String, to: String },
    /// Fetch or pull failed; the existing checkout is used as-is.
    Stale { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_missing_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let state = RepositoryState::inspect(&dir.path().join("OSX-KVM"));
        assert!(!state.present);
        assert!(state.local_commit.is_none());
        assert!(!state.is_up_to_date());
    }

    #[test]
    fn test_inspect_detects_marker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let state = RepositoryState::inspect(dir.path());
        assert!(state.present);
    }

    #[test]
    fn test_up_to_date_requires_equal_tips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        let equal = RepositoryState::inspect(dir.path()).with_commits("abc", "abc");
        assert!(equal.is_up_to_date());

        let behind = RepositoryState::inspect(dir.path()).with_commits("abc", "def");
        assert!(!behind.is_up_to_date());
    }
}
