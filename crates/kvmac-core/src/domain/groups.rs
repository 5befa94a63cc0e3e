//! Group membership needed for unprivileged device access.

use serde::{Deserialize, Serialize};

/// Groups granting access to `/dev/kvm`, libvirt and input devices.
pub const REQUIRED_GROUPS: &[&str] = &["kvm", "libvirt", "input"];

/// Required groups not present in `current`, in required order.
pub fn missing_groups(required: &[String], current: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|group| !current.contains(group))
        .cloned()
        .collect()
}

/// Result of the group membership step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipOutcome {
    /// Groups the user was added to during this run.
    pub added: Vec<String>,
    /// Groups whose addition failed, with the reported reason.
    pub failed: Vec<(String, String)>,
}

impl MembershipOutcome {
    /// True when the user already had every required group.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.failed.is_empty()
    }
}
