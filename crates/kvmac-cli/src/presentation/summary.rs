//! Pre-flight banner and end-of-run summary.

use console::style;
use kvmac_core::{ConversionGate, ProvisionConfig, ProvisionReport};

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Lines describing what this run will operate on.
pub fn banner_lines(config: &ProvisionConfig) -> Vec<String> {
    let gate = match config.conversion_gate {
        ConversionGate::OutputAbsent => "when BaseSystem.img is missing",
        ConversionGate::SourceAbsent => "only when BaseSystem.dmg is missing",
    };
    vec![
        format!("User:          {}", config.identity.invoking_user),
        format!("Toolkit:       {}", config.toolkit_dir.display()),
        format!("Repository:    {} ({})", config.repo_url, config.branch),
        format!("KVM config:    {}", config.modprobe_conf.display()),
        format!("Convert image: {gate}"),
    ]
}

pub fn print_banner(config: &ProvisionConfig) {
    println!("{}", style("kvmac - macOS on KVM").bold());
    print_separator(60);
    for line in banner_lines(config) {
        println!("{line}");
    }
    print_separator(60);
}

pub fn print_report(report: &ProvisionReport) {
    println!();
    println!("{}", style("Summary").bold());
    print_separator(60);
    for line in report.summary_lines() {
        println!("{line}");
    }
    print_separator(60);
    if report.is_converged() {
        println!("{}", style("✓ Host already provisioned, nothing changed").green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvmac_core::HostIdentity;

    #[test]
    fn test_banner_mentions_user_and_toolkit() {
        let config = ProvisionConfig::with_defaults(HostIdentity::new("alice", "/home/alice", true));
        let lines = banner_lines(&config);
        assert!(lines[0].ends_with("alice"));
        assert!(lines[1].ends_with("/home/alice/OSX-KVM"));
        assert!(lines[4].contains("BaseSystem.img"));
    }
}
