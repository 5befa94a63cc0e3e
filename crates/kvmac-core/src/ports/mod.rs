//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the provisioning services expect from the
//! host. They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - One awaited call per external action
//! - No process/`Command` details in any signature
//! - Every tool failure is a [`ToolError`] carrying the tool's exit status

pub mod accounts;
pub mod images;
pub mod launcher;
pub mod operator;
pub mod package_manager;
pub mod version_control;

use std::sync::Arc;
use thiserror::Error;

pub use accounts::AccountManager;
pub use images::{DiskImageBuilder, ImageConverter, ImageFetcher};
pub use launcher::ProcessLauncher;
pub use operator::{
    Operator, OperatorError, OperatorResult, ScriptedOperator, interpret_confirmation,
    interpret_number,
};
pub use package_manager::PackageManager;
pub use version_control::VersionControl;

/// Container for every host-facing trait object.
///
/// Adapters build one of these at their composition root and hand it to
/// [`Provisioner`](crate::services::Provisioner), which never sees a concrete
/// implementation.
///
/// # Example
///
/// ```ignore
/// let ports = kvmac_runtime::build_ports(operator);
/// let provisioner = Provisioner::new(config, ports);
/// ```
#[derive(Clone)]
pub struct Ports {
    pub packages: Arc<dyn PackageManager>,
    pub vcs: Arc<dyn VersionControl>,
    pub accounts: Arc<dyn AccountManager>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub converter: Arc<dyn ImageConverter>,
    pub disk_builder: Arc<dyn DiskImageBuilder>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub operator: Arc<dyn Operator>,
}

/// Errors reported by external tool adapters.
///
/// This error type abstracts away how a tool was invoked and keeps only what
/// the orchestration needs: which tool, and whether it exited with a status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// The tool could not be started at all.
    #[error("Failed to start {tool}: {reason}")]
    SpawnFailed { tool: String, reason: String },

    /// The tool ran and reported failure.
    #[error("{tool} failed ({}): {message}", describe_code(.code))]
    Failed {
        tool: String,
        code: Option<i32>,
        message: String,
    },

    /// The tool succeeded but its output could not be understood.
    #[error("Unexpected output from {tool}: {reason}")]
    UnexpectedOutput { tool: String, reason: String },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit status {c}"),
    )
}

impl ToolError {
    pub fn spawn_failed(tool: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }

    pub fn failed(tool: impl Into<String>, code: Option<i32>, message: impl Into<String>) -> Self {
        Self::Failed {
            tool: tool.into(),
            code,
            message: message.into(),
        }
    }

    /// Exit status of the tool, when it exited normally with one.
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_only_for_failed() {
        assert_eq!(ToolError::failed("git", Some(128), "boom").exit_code(), Some(128));
        assert_eq!(ToolError::failed("git", None, "killed").exit_code(), None);
        assert_eq!(ToolError::spawn_failed("git", "not found").exit_code(), None);
    }

    #[test]
    fn test_display_mentions_status() {
        let err = ToolError::failed("apt-get", Some(100), "Unable to locate package");
        assert_eq!(
            err.to_string(),
            "apt-get failed (exit status 100): Unable to locate package"
        );
        let err = ToolError::failed("qemu-img", None, "");
        assert!(err.to_string().contains("terminated by signal"));
    }
}
