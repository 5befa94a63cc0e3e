//! Per-run summary of every provisioning step.

use serde::Serialize;

use super::{
    AssetOutcome, DependencyOutcome, HostConfigOutcome, MembershipOutcome, ResourceOutcome,
    SyncOutcome,
};

/// Outcome of steps 1 to 6 of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub dependencies: DependencyOutcome,
    pub repository: SyncOutcome,
    pub host_config: HostConfigOutcome,
    pub groups: MembershipOutcome,
    pub assets: AssetOutcome,
    pub resources: ResourceOutcome,
}

impl ProvisionReport {
    /// True when the run changed nothing on the host.
    pub fn is_converged(&self) -> bool {
        self.dependencies == DependencyOutcome::AllSatisfied
            && self.repository == SyncOutcome::UpToDate
            && matches!(self.host_config, HostConfigOutcome::AlreadyConfigured(_))
            && self.groups.is_noop()
            && self.assets.is_converged()
            && self.resources.applied.is_empty()
    }

    /// Human-readable lines, one per step.
    pub fn summary_lines(&self) -> Vec<String> {
        let dependencies = match &self.dependencies {
            DependencyOutcome::AllSatisfied => "all satisfied".to_string(),
            DependencyOutcome::Installed(names) => format!("installed {}", names.join(", ")),
        };

        let repository = match &self.repository {
            SyncOutcome::Cloned => "cloned".to_string(),
            SyncOutcome::UpToDate => "up to date".to_string(),
            SyncOutcome::Updated { from, to } => format!("updated {from} -> {to}"),
            SyncOutcome::Stale { reason } => format!("using existing checkout ({reason})"),
        };

        let host_config = match self.host_config {
            HostConfigOutcome::AlreadyConfigured(v) => format!("{v} profile already present"),
            HostConfigOutcome::Applied(v) => format!("{v} profile applied"),
        };

        let groups = if self.groups.is_noop() {
            "already a member of all groups".to_string()
        } else {
            let mut parts = Vec::new();
            if !self.groups.added.is_empty() {
                parts.push(format!("added to {}", self.groups.added.join(", ")));
            }
            if !self.groups.failed.is_empty() {
                let failed: Vec<&str> = self.groups.failed.iter().map(|(g, _)| g.as_str()).collect();
                parts.push(format!("failed for {}", failed.join(", ")));
            }
            parts.join("; ")
        };

        let assets = format!(
            "base image {}, mountable image {}, virtual disk {}",
            status_word(&self.assets.base_image),
            status_word(&self.assets.mountable_image),
            status_word(&self.assets.virtual_disk),
        );

        let resources = if self.resources.applied.is_empty() {
            "unchanged".to_string()
        } else {
            format!("{} change(s) applied", self.resources.applied.len())
        };

        vec![
            format!("Dependencies:  {dependencies}"),
            format!("Toolkit:       {repository}"),
            format!("KVM profile:   {host_config}"),
            format!("Groups:        {groups}"),
            format!("Disk images:   {assets}"),
            format!("Resources:     {resources}"),
        ]
    }
}

const fn status_word(status: &super::StepStatus) -> &'static str {
    match status {
        super::StepStatus::Created => "created",
        super::StepStatus::Skipped => "present",
        super::StepStatus::Failed(_) => "FAILED",
    }
}
