//! Git command-line adapter.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use kvmac_core::ToolError;
use kvmac_core::ports::VersionControl;
use tracing::{debug, info};

use crate::command::{command, run_attached, run_captured};

/// Version control via the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    show_progress: bool,
}

impl GitCli {
    pub const fn new() -> Self {
        Self {
            show_progress: false,
        }
    }

    /// Show a spinner while cloning and fetching.
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

/// Arguments for running `args` inside `repo` via `git -C`.
fn in_repo<'a>(repo: &'a Path, args: &[&'a str]) -> Vec<&'a OsStr> {
    let mut all = vec![OsStr::new("-C"), repo.as_os_str()];
    all.extend(args.iter().map(|a| OsStr::new(*a)));
    all
}

/// Name of the remote-tracking ref for `branch`.
pub fn remote_ref(branch: &str) -> String {
    format!("origin/{branch}")
}

#[async_trait]
impl VersionControl for GitCli {
    async fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<(), ToolError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ToolError::spawn_failed("git", e))?;
        }

        let mut cmd = command(
            "git",
            ["clone", "--depth", "1", "--recursive", "--branch", branch, url],
        );
        cmd.arg(dest);

        let pb = self.spinner("Cloning toolkit repository...");
        let result = run_captured("git", cmd).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;

        info!(url, dest = %dest.display(), "Cloned repository");
        Ok(())
    }

    async fn fetch(&self, repo: &Path, branch: &str) -> Result<(), ToolError> {
        let cmd = command("git", in_repo(repo, &["fetch", "origin", branch]));
        let pb = self.spinner("Fetching toolkit updates...");
        let result = run_captured("git", cmd).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result.map(|_| ())
    }

    async fn head_commit(&self, repo: &Path) -> Result<String, ToolError> {
        let sha = run_captured("git", command("git", in_repo(repo, &["rev-parse", "HEAD"]))).await?;
        debug!(%sha, "Local HEAD");
        non_empty_sha(sha)
    }

    async fn remote_commit(&self, repo: &Path, branch: &str) -> Result<String, ToolError> {
        let reference = remote_ref(branch);
        let sha = run_captured(
            "git",
            command("git", in_repo(repo, &["rev-parse", reference.as_str()])),
        )
        .await?;
        debug!(%sha, reference = %reference, "Remote tip");
        non_empty_sha(sha)
    }

    async fn pull(&self, repo: &Path, branch: &str) -> Result<(), ToolError> {
        run_attached(
            "git",
            command(
                "git",
                in_repo(repo, &["pull", "--recurse-submodules", "origin", branch]),
            ),
        )
        .await
    }
}

fn non_empty_sha(sha: String) -> Result<String, ToolError> {
    if sha.is_empty() {
        Err(ToolError::UnexpectedOutput {
            tool: "git".to_string(),
            reason: "empty commit id".to_string(),
        })
    } else {
        Ok(sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_ref() {
        assert_eq!(remote_ref("master"), "origin/master");
    }

    #[test]
    fn test_in_repo_prefixes_directory() {
        let args = in_repo(Path::new("/tmp/OSX-KVM"), &["rev-parse", "HEAD"]);
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-C", "/tmp/OSX-KVM", "rev-parse", "HEAD"]);
    }

    #[test]
    fn test_empty_sha_is_unexpected() {
        assert!(non_empty_sha(String::new()).is_err());
        assert_eq!(non_empty_sha("abc".into()).unwrap(), "abc");
    }
}
