//! Disk image artifacts produced inside the toolkit checkout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// macOS recovery image as downloaded by the toolkit's fetch script.
pub const BASE_IMAGE: &str = "BaseSystem.dmg";

/// Raw image converted from [`BASE_IMAGE`].
pub const MOUNTABLE_IMAGE: &str = "BaseSystem.img";

/// Guest system disk.
pub const VIRTUAL_DISK: &str = "mac_hdd_ng.img";

/// Size offered when the operator has no preference.
pub const DEFAULT_DISK_SIZE: &str = "256G";

/// Decides when the base image is converted to its mountable form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionGate {
    /// Convert when the converted image does not exist yet.
    #[default]
    OutputAbsent,
    /// Convert only when the source image is absent. This is how earlier
    /// releases of the setup scripts behaved: with the source present the
    /// conversion never runs.
    SourceAbsent,
}

impl FromStr for ConversionGate {
    type Err = crate::config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "output" | "output_absent" => Ok(Self::OutputAbsent),
            "source" | "source_absent" | "legacy" => Ok(Self::SourceAbsent),
            other => Err(crate::config::ConfigError::UnknownConversionGate(
                other.to_string(),
            )),
        }
    }
}

/// Validated disk size in `qemu-img` notation, e.g. `256G`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSize {
    magnitude: u64,
    suffix: Option<char>,
}

/// Reason a disk size string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiskSizeError {
    #[error("Disk size cannot be empty")]
    Empty,

    #[error("Disk size must start with a positive whole number, got '{0}'")]
    InvalidMagnitude(String),

    #[error("Unknown size suffix '{0}' (use K, M, G or T)")]
    InvalidSuffix(String),
}

impl DiskSize {
    pub const fn magnitude(&self) -> u64 {
        self.magnitude
    }

    /// Size in bytes, saturating on overflow.
    pub fn bytes(&self) -> u64 {
        let shift = match self.suffix {
            None => 0,
            Some('K') => 10,
            Some('M') => 20,
            Some('G') => 30,
            Some(_) => 40,
        };
        self.magnitude.saturating_mul(1u64 << shift)
    }
}

impl FromStr for DiskSize {
    type Err = DiskSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(DiskSizeError::Empty);
        }

        let digits_end = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, unit) = input.split_at(digits_end);

        let magnitude = digits
            .parse::<u64>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| DiskSizeError::InvalidMagnitude(input.to_string()))?;

        let unit_upper = unit.trim().to_ascii_uppercase();
        let prefix = unit_upper
            .strip_suffix("IB")
            .or_else(|| unit_upper.strip_suffix('B'))
            .unwrap_or(unit_upper.as_str());

        let suffix = match prefix {
            "" => None,
            "K" | "M" | "G" | "T" => prefix.chars().next(),
            _ => return Err(DiskSizeError::InvalidSuffix(unit.to_string())),
        };

        Ok(Self { magnitude, suffix })
    }
}

impl fmt::Display for DiskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix {
            Some(suffix) => write!(f, "{}{suffix}", self.magnitude),
            None => write!(f, "{}", self.magnitude),
        }
    }
}

/// What happened to one artifact during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum StepStatus {
    /// The artifact was produced in this run.
    Created,
    /// The convergence check found nothing to do.
    Skipped,
    /// The artifact could not be produced.
    Failed(String),
}

impl StepStatus {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of the asset pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOutcome {
    pub base_image: StepStatus,
    pub mountable_image: StepStatus,
    pub virtual_disk: StepStatus,
}

impl AssetOutcome {
    /// True when no artifact was created or failed.
    pub fn is_converged(&self) -> bool {
        [&self.base_image, &self.mountable_image, &self.virtual_disk]
            .iter()
            .all(|status| **status == StepStatus::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disk_sizes() {
        assert_eq!("256G".parse::<DiskSize>().unwrap().to_string(), "256G");
        assert_eq!("128g".parse::<DiskSize>().unwrap().to_string(), "128G");
        assert_eq!("64GiB".parse::<DiskSize>().unwrap().to_string(), "64G");
        assert_eq!("1T".parse::<DiskSize>().unwrap().to_string(), "1T");
        assert_eq!(" 512M ".parse::<DiskSize>().unwrap().to_string(), "512M");
        assert_eq!("1048576".parse::<DiskSize>().unwrap().to_string(), "1048576");
    }

    #[test]
    fn test_reject_bad_disk_sizes() {
        assert_eq!("".parse::<DiskSize>(), Err(DiskSizeError::Empty));
        assert!(matches!(
            "0G".parse::<DiskSize>(),
            Err(DiskSizeError::InvalidMagnitude(_))
        ));
        assert!(matches!(
            "G".parse::<DiskSize>(),
            Err(DiskSizeError::InvalidMagnitude(_))
        ));
        assert!(matches!(
            "12X".parse::<DiskSize>(),
            Err(DiskSizeError::InvalidSuffix(_))
        ));
        assert!(matches!(
            "-5G".parse::<DiskSize>(),
            Err(DiskSizeError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn test_disk_size_bytes() {
        let size: DiskSize = "2K".parse().unwrap();
        assert_eq!(size.bytes(), 2048);
        let size: DiskSize = "1G".parse().unwrap();
        assert_eq!(size.bytes(), 1 << 30);
    }

    #[test]
    fn test_conversion_gate_parse() {
        assert_eq!(
            "output".parse::<ConversionGate>().unwrap(),
            ConversionGate::OutputAbsent
        );
        assert_eq!(
            "Source".parse::<ConversionGate>().unwrap(),
            ConversionGate::SourceAbsent
        );
        assert!("sometimes".parse::<ConversionGate>().is_err());
    }

    #[test]
    fn test_outcome_converged() {
        let outcome = AssetOutcome {
            base_image: StepStatus::Skipped,
            mountable_image: StepStatus::Skipped,
            virtual_disk: StepStatus::Skipped,
        };
        assert!(outcome.is_converged());

        let outcome = AssetOutcome {
            virtual_disk: StepStatus::Created,
            ..outcome
        };
        assert!(!outcome.is_converged());
    }
}
