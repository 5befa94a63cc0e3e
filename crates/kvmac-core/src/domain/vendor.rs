//! CPU vendor profiles for the KVM kernel module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host CPU manufacturer as far as KVM configuration is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuVendor {
    Intel,
    Amd,
    Unknown,
}

impl CpuVendor {
    /// Vendors an operator may pick.
    pub const CHOICES: [Self; 2] = [Self::Intel, Self::Amd];

    /// Module name that appears in a configured modprobe file.
    pub const fn marker(self) -> Option<&'static str> {
        match self {
            Self::Intel => Some("kvm_intel"),
            Self::Amd => Some("kvm_amd"),
            Self::Unknown => None,
        }
    }

    /// Template shipped in the toolkit checkout for this vendor.
    pub const fn template_file(self) -> Option<&'static str> {
        match self {
            Self::Intel => Some("kvm.conf"),
            Self::Amd => Some("kvm_amd.conf"),
            Self::Unknown => None,
        }
    }

    /// Answer string accepted at the vendor prompt.
    pub const fn choice_key(self) -> &'static str {
        match self {
            Self::Intel => "intel",
            Self::Amd => "amd",
            Self::Unknown => "unknown",
        }
    }

    /// Detect an already-applied profile from modprobe configuration text.
    pub fn detect_configured(text: &str) -> Self {
        Self::CHOICES
            .into_iter()
            .find(|vendor| vendor.marker().is_some_and(|m| text.contains(m)))
            .unwrap_or(Self::Unknown)
    }

    /// Read the hardware vendor from `/proc/cpuinfo` text.
    pub fn from_cpuinfo(text: &str) -> Self {
        text.lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim() == "vendor_id")
            .map_or(Self::Unknown, |(_, value)| match value.trim() {
                "GenuineIntel" => Self::Intel,
                "AuthenticAMD" => Self::Amd,
                _ => Self::Unknown,
            })
    }

    /// Parse an operator answer. Only Intel and AMD are valid choices.
    pub fn parse_choice(input: &str) -> Option<Self> {
        let answer = input.trim();
        Self::CHOICES
            .into_iter()
            .find(|vendor| vendor.choice_key().eq_ignore_ascii_case(answer))
    }
}

impl fmt::Display for CpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intel => write!(f, "Intel"),
            Self::Amd => write!(f, "AMD"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of the host configuration step. Recorded once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "vendor")]
pub enum HostConfigOutcome {
    /// A vendor profile was already present; nothing was written.
    AlreadyConfigured(CpuVendor),
    /// The operator picked a vendor and its template was copied into place.
    Applied(CpuVendor),
}

impl HostConfigOutcome {
    pub const fn vendor(self) -> CpuVendor {
        match self {
            Self::AlreadyConfigured(v) | Self::Applied(v) => v,
        }
    }
}
