//! CLI error type and exit-code mapping.

use kvmac_core::{ConfigError, ProvisionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// A provisioning step failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Start-up plumbing failed before provisioning began.
    #[error("{0:#}")]
    Startup(#[from] anyhow::Error),
}

impl CliError {
    /// Map error to the process exit code.
    ///
    /// - 1: precondition, configuration or internal failure
    /// - 2: invalid CPU vendor selection
    /// - otherwise the failing tool's own exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Provision(ProvisionError::InvalidVendor(_)) => 2,
            Self::Provision(err) => err
                .tool_error()
                .and_then(kvmac_core::ToolError::exit_code)
                .filter(|code| (1..=255).contains(code))
                .unwrap_or(1),
            Self::Config(_) | Self::Startup(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvmac_core::ToolError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(ProvisionError::NotElevated).exit_code(), 1);
        assert_eq!(
            CliError::from(ProvisionError::InvalidVendor("arm".into())).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(ProvisionError::ToolkitUnavailable {
                path: "/home/a/OSX-KVM".into(),
                reason: "not a directory".into(),
            })
            .exit_code(),
            1
        );
        assert_eq!(CliError::from(ConfigError::EmptyBranch).exit_code(), 1);
    }

    #[test]
    fn test_tool_status_propagates() {
        let err = ProvisionError::DependencyInstall(ToolError::failed("apt-get", Some(100), "E"));
        assert_eq!(CliError::from(err).exit_code(), 100);

        let err = ProvisionError::Clone(ToolError::failed("git", Some(128), "fatal"));
        assert_eq!(CliError::from(err).exit_code(), 128);

        let err = ProvisionError::Clone(ToolError::failed("git", None, "killed"));
        assert_eq!(CliError::from(err).exit_code(), 1);

        let err = ProvisionError::Launch {
            script: "OpenCore-Boot.sh".into(),
            source: ToolError::spawn_failed("OpenCore-Boot.sh", "Permission denied"),
        };
        assert_eq!(CliError::from(err).exit_code(), 1);
    }
}
