//! Provisioning error type.
//!
//! Only failures that stop the run are errors. Recoverable failures (a
//! failed fetch, a failed group addition, a failed image step) are recorded
//! in the [`ProvisionReport`](crate::domain::ProvisionReport) instead.
//! Adapters map these variants to their own exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::{OperatorError, ToolError};

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The process does not run with elevated privileges.
    #[error("This tool must be run as root (try: sudo kvmac)")]
    NotElevated,

    /// The toolkit checkout is missing or not a directory after sync.
    #[error("Cannot use toolkit directory {path}: {reason}")]
    ToolkitUnavailable { path: PathBuf, reason: String },

    /// Installing missing packages failed.
    #[error("Dependency installation failed: {0}")]
    DependencyInstall(#[source] ToolError),

    /// Cloning the toolkit failed.
    #[error("Could not clone the toolkit repository: {0}")]
    Clone(#[source] ToolError),

    /// The operator picked something other than a known CPU vendor.
    #[error("Invalid CPU vendor '{0}' (expected 'intel' or 'amd')")]
    InvalidVendor(String),

    /// Handing off to the boot script failed.
    #[error("Could not launch {script}: {source}")]
    Launch {
        script: PathBuf,
        #[source]
        source: ToolError,
    },

    /// Reading or writing a host file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asking the operator failed.
    #[error(transparent)]
    Operator(#[from] OperatorError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProvisionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The external tool failure behind this error, if any.
    pub const fn tool_error(&self) -> Option<&ToolError> {
        match self {
            Self::DependencyInstall(err) | Self::Clone(err) | Self::Launch { source: err, .. } => {
                Some(err)
            }
            _ => None,
        }
    }
}
