//! Host configurator - selects the KVM module profile for the CPU vendor.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ProvisionConfig;
use crate::domain::{CpuVendor, HostConfigOutcome};
use crate::error::ProvisionError;
use crate::ports::Operator;

/// Service applying the vendor-specific modprobe template once.
pub struct HostConfigurator {
    operator: Arc<dyn Operator>,
}

impl HostConfigurator {
    pub fn new(operator: Arc<dyn Operator>) -> Self {
        Self { operator }
    }

    /// Ensure the modprobe configuration carries a vendor profile.
    ///
    /// When a profile marker is already present nothing is asked or written.
    /// Otherwise the operator picks a vendor and the matching template from
    /// the toolkit replaces the configuration file.
    pub fn ensure(&self, config: &ProvisionConfig) -> Result<HostConfigOutcome, ProvisionError> {
        let current = read_optional(&config.modprobe_conf)?;
        let configured = CpuVendor::detect_configured(&current);
        if configured != CpuVendor::Unknown {
            info!(vendor = %configured, "KVM module profile already present");
            self.operator
                .info(&format!("✓ KVM is already configured for {configured}"));
            return Ok(HostConfigOutcome::AlreadyConfigured(configured));
        }

        let detected = fs::read_to_string(&config.cpuinfo_path)
            .map(|text| CpuVendor::from_cpuinfo(&text))
            .unwrap_or(CpuVendor::Unknown);
        debug!(vendor = %detected, "CPU vendor hint");
        if detected != CpuVendor::Unknown {
            self.operator
                .info(&format!("This machine reports a {detected} CPU."));
        }

        let options: Vec<String> = CpuVendor::CHOICES
            .iter()
            .map(|vendor| vendor.choice_key().to_string())
            .collect();
        let answer = self
            .operator
            .choose("Select your CPU vendor", &options)?;

        let vendor = CpuVendor::parse_choice(&answer)
            .ok_or_else(|| ProvisionError::InvalidVendor(answer.clone()))?;
        let Some(template_name) = vendor.template_file() else {
            return Err(ProvisionError::InvalidVendor(answer));
        };

        let template = config.toolkit_file(template_name);
        if let Some(parent) = config.modprobe_conf.parent() {
            fs::create_dir_all(parent).map_err(|e| ProvisionError::io(parent, e))?;
        }
        fs::copy(&template, &config.modprobe_conf)
            .map_err(|e| ProvisionError::io(&template, e))?;

        info!(
            vendor = %vendor,
            template = %template.display(),
            target = %config.modprobe_conf.display(),
            "Applied KVM module profile"
        );
        self.operator
            .info(&format!("✓ KVM configured for {vendor}"));
        Ok(HostConfigOutcome::Applied(vendor))
    }
}

/// Read a text file, treating a missing file as empty.
fn read_optional(path: &Path) -> Result<String, ProvisionError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ProvisionError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostIdentity;
    use crate::ports::ScriptedOperator;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ProvisionConfig) {
        let dir = tempfile::tempdir().unwrap();
        let toolkit = dir.path().join("OSX-KVM");
        fs::create_dir(&toolkit).unwrap();
        fs::write(toolkit.join("kvm.conf"), "options kvm_intel nested=1\n").unwrap();
        fs::write(toolkit.join("kvm_amd.conf"), "options kvm_amd nested=1\n").unwrap();

        let config = ProvisionConfig::with_defaults(HostIdentity::new("alice", dir.path(), true))
            .with_toolkit_dir(&toolkit)
            .with_modprobe_conf(dir.path().join("modprobe.d/kvm.conf"))
            .with_cpuinfo_path(dir.path().join("cpuinfo"));
        (dir, config)
    }

    #[test]
    fn test_marker_present_skips_prompt() {
        let (_dir, config) = setup();
        fs::create_dir_all(config.modprobe_conf.parent().unwrap()).unwrap();
        fs::write(&config.modprobe_conf, "options kvm_intel nested=1\n").unwrap();
        let op = Arc::new(ScriptedOperator::default());

        let outcome = HostConfigurator::new(op.clone()).ensure(&config).unwrap();
        assert_eq!(outcome, HostConfigOutcome::AlreadyConfigured(CpuVendor::Intel));
        assert!(op.prompts().is_empty());
    }

    #[test]
    fn test_amd_choice_copies_amd_template() {
        let (_dir, config) = setup();
        fs::write(&config.cpuinfo_path, "vendor_id\t: AuthenticAMD\n").unwrap();
        let op = Arc::new(ScriptedOperator::new(["amd"]));

        let outcome = HostConfigurator::new(op.clone()).ensure(&config).unwrap();
        assert_eq!(outcome, HostConfigOutcome::Applied(CpuVendor::Amd));
        assert_eq!(
            fs::read_to_string(&config.modprobe_conf).unwrap(),
            "options kvm_amd nested=1\n"
        );
        assert!(op.messages().iter().any(|m| m.contains("AMD CPU")));
    }

    #[test]
    fn test_invalid_vendor_writes_nothing() {
        let (_dir, config) = setup();
        let op = Arc::new(ScriptedOperator::new(["arm"]));

        let err = HostConfigurator::new(op).ensure(&config).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidVendor(ref v) if v == "arm"));
        assert!(!config.modprobe_conf.exists());
    }

    #[test]
    fn test_missing_template_is_io_error() {
        let (_dir, config) = setup();
        fs::remove_file(config.toolkit_file("kvm.conf")).unwrap();
        let op = Arc::new(ScriptedOperator::new(["intel"]));

        let err = HostConfigurator::new(op).ensure(&config).unwrap_err();
        assert!(matches!(err, ProvisionError::Io { .. }));
    }
}
