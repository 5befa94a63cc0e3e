//! Provisioning configuration.
//!
//! This module contains the explicit configuration that is threaded through
//! every provisioning step. These are pure types with no infrastructure
//! dependencies; the CLI bootstrap resolves the host identity and any
//! environment overrides before building a [`ProvisionConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{ConversionGate, REQUIRED_GROUPS, REQUIRED_PACKAGES};

/// Default remote of the OSX-KVM toolkit.
pub const DEFAULT_REPO_URL: &str = "https://github.com/kholia/OSX-KVM.git";

/// Default tracked branch of the toolkit.
pub const DEFAULT_BRANCH: &str = "master";

/// Directory name of the toolkit checkout inside the invoking user's home.
pub const DEFAULT_TOOLKIT_DIR_NAME: &str = "OSX-KVM";

/// Default system path of the KVM module configuration.
pub const DEFAULT_MODPROBE_CONF: &str = "/etc/modprobe.d/kvm.conf";

/// Default source of the CPU vendor hint.
pub const DEFAULT_CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Who is running the tool.
///
/// The process itself runs elevated, but the toolkit checkout and the group
/// memberships belong to the user who invoked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    /// Login name of the invoking (non-elevated) user.
    pub invoking_user: String,
    /// Home directory of the invoking user.
    pub home_dir: PathBuf,
    /// Whether the process runs with elevated privileges.
    pub elevated: bool,
}

impl HostIdentity {
    pub fn new(invoking_user: impl Into<String>, home_dir: impl Into<PathBuf>, elevated: bool) -> Self {
        Self {
            invoking_user: invoking_user.into(),
            home_dir: home_dir.into(),
            elevated,
        }
    }
}

/// Configuration for a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Invoking user and privilege state.
    pub identity: HostIdentity,
    /// Local checkout of the toolkit.
    pub toolkit_dir: PathBuf,
    /// Remote URL of the toolkit repository.
    pub repo_url: String,
    /// Branch tracked by the checkout.
    pub branch: String,
    /// System KVM module configuration file.
    pub modprobe_conf: PathBuf,
    /// File used for the CPU vendor hint.
    pub cpuinfo_path: PathBuf,
    /// Rule deciding when the base image is converted.
    pub conversion_gate: ConversionGate,
    /// OS packages that must be installed, in query order.
    pub packages: Vec<String>,
    /// Groups the invoking user must belong to.
    pub groups: Vec<String>,
}

impl ProvisionConfig {
    /// Create a configuration with defaults derived from the host identity.
    pub fn with_defaults(identity: HostIdentity) -> Self {
        let toolkit_dir = identity.home_dir.join(DEFAULT_TOOLKIT_DIR_NAME);
        Self {
            identity,
            toolkit_dir,
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            modprobe_conf: PathBuf::from(DEFAULT_MODPROBE_CONF),
            cpuinfo_path: PathBuf::from(DEFAULT_CPUINFO_PATH),
            conversion_gate: ConversionGate::default(),
            packages: REQUIRED_PACKAGES.iter().map(ToString::to_string).collect(),
            groups: REQUIRED_GROUPS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_toolkit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.toolkit_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = url.into();
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_modprobe_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.modprobe_conf = path.into();
        self
    }

    #[must_use]
    pub fn with_cpuinfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cpuinfo_path = path.into();
        self
    }

    #[must_use]
    pub const fn with_conversion_gate(mut self, gate: ConversionGate) -> Self {
        self.conversion_gate = gate;
        self
    }

    #[must_use]
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.packages = packages;
        self
    }

    /// Resolve a file name relative to the toolkit checkout.
    pub fn toolkit_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.toolkit_dir.join(name)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Repository URL cannot be empty")]
    EmptyRepoUrl,

    #[error("Branch name cannot be empty")]
    EmptyBranch,

    #[error("Toolkit directory cannot be empty")]
    EmptyToolkitDir,

    #[error("Invoking user cannot be empty")]
    EmptyUser,

    #[error("Unknown conversion gate '{0}' (expected 'output' or 'source')")]
    UnknownConversionGate(String),
}

/// Validate configuration values.
pub fn validate_config(config: &ProvisionConfig) -> Result<(), ConfigError> {
    if config.repo_url.trim().is_empty() {
        return Err(ConfigError::EmptyRepoUrl);
    }

    if config.branch.trim().is_empty() {
        return Err(ConfigError::EmptyBranch);
    }

    if config.toolkit_dir.as_os_str().is_empty() {
        return Err(ConfigError::EmptyToolkitDir);
    }

    if config.identity.invoking_user.trim().is_empty() {
        return Err(ConfigError::EmptyUser);
    }

    Ok(())
}
