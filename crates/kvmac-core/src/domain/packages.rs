//! Required OS packages.

use serde::{Deserialize, Serialize};

/// Packages needed on a Debian/Ubuntu host to fetch, convert and boot a
/// macOS guest with the OSX-KVM toolkit.
pub const REQUIRED_PACKAGES: &[&str] = &[
    "qemu-system",
    "qemu-utils",
    "python3",
    "python3-pip",
    "git",
    "wget",
    "libguestfs-tools",
    "p7zip-full",
    "make",
    "dmg2img",
    "genisoimage",
    "uml-utilities",
    "virt-manager",
];

/// A required package and whether the package database reports it installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequirement {
    pub name: String,
    pub installed: bool,
}

impl PackageRequirement {
    pub fn new(name: impl Into<String>, installed: bool) -> Self {
        Self {
            name: name.into(),
            installed,
        }
    }
}

/// Names of the requirements that are not installed, in query order.
pub fn missing_packages(requirements: &[PackageRequirement]) -> Vec<String> {
    requirements
        .iter()
        .filter(|r| !r.installed)
        .map(|r| r.name.clone())
        .collect()
}

/// Result of the dependency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "packages")]
pub enum DependencyOutcome {
    /// Every package was already present; nothing was installed.
    AllSatisfied,
    /// Exactly these packages were installed in one batch.
    Installed(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_packages_preserves_order() {
        let reqs = vec![
            PackageRequirement::new("git", true),
            PackageRequirement::new("dmg2img", false),
            PackageRequirement::new("make", true),
            PackageRequirement::new("qemu-utils", false),
        ];
        assert_eq!(missing_packages(&reqs), vec!["dmg2img", "qemu-utils"]);
    }

    #[test]
    fn test_missing_packages_empty_when_all_installed() {
        let reqs = vec![PackageRequirement::new("git", true)];
        assert!(missing_packages(&reqs).is_empty());
    }

    #[test]
    fn test_required_packages_have_no_duplicates() {
        let mut names: Vec<&str> = REQUIRED_PACKAGES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), REQUIRED_PACKAGES.len());
    }
}
