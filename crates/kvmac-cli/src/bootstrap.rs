//! CLI bootstrap - the composition root.
//!
//! The only place where concrete adapters are wired together:
//! - host identity (via kvmac-runtime)
//! - environment overrides on top of the core defaults
//! - host tool adapters (via kvmac-runtime)
//! - the `Provisioner` facade (via kvmac-core)

use std::path::PathBuf;
use std::sync::Arc;

use kvmac_core::ports::Operator;
use kvmac_core::{ConfigError, ConversionGate, HostIdentity, ProvisionConfig, Provisioner, validate_config};

pub const ENV_TOOLKIT_DIR: &str = "KVMAC_TOOLKIT_DIR";
pub const ENV_REPO_URL: &str = "KVMAC_REPO_URL";
pub const ENV_BRANCH: &str = "KVMAC_BRANCH";
pub const ENV_MODPROBE_CONF: &str = "KVMAC_MODPROBE_CONF";
pub const ENV_CONVERSION_GATE: &str = "KVMAC_CONVERSION_GATE";

/// Environment overrides for a run. Unset values keep the core defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub toolkit_dir: Option<PathBuf>,
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub modprobe_conf: Option<PathBuf>,
    pub conversion_gate: Option<String>,
}

impl CliConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            toolkit_dir: get(ENV_TOOLKIT_DIR).map(PathBuf::from),
            repo_url: get(ENV_REPO_URL),
            branch: get(ENV_BRANCH),
            modprobe_conf: get(ENV_MODPROBE_CONF).map(PathBuf::from),
            conversion_gate: get(ENV_CONVERSION_GATE),
        }
    }

    /// Merge the overrides into the defaults for `identity` and validate.
    pub fn into_provision_config(self, identity: HostIdentity) -> Result<ProvisionConfig, ConfigError> {
        let mut config = ProvisionConfig::with_defaults(identity);

        if let Some(dir) = self.toolkit_dir {
            config = config.with_toolkit_dir(dir);
        }
        if let Some(url) = self.repo_url {
            config = config.with_repo_url(url);
        }
        if let Some(branch) = self.branch {
            config = config.with_branch(branch);
        }
        if let Some(path) = self.modprobe_conf {
            config = config.with_modprobe_conf(path);
        }
        if let Some(gate) = self.conversion_gate {
            config = config.with_conversion_gate(gate.parse::<ConversionGate>()?);
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Compose the provisioner from real host adapters.
pub fn bootstrap(config: ProvisionConfig, operator: Arc<dyn Operator>, show_progress: bool) -> Provisioner {
    let ports = kvmac_runtime::build_ports(operator, show_progress);
    Provisioner::new(config, ports)
}
