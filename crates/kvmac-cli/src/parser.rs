//! Command-line definition.
//!
//! `kvmac` takes no operational arguments: everything it needs is either
//! detected from the host, read from the environment or asked for
//! interactively.

use clap::Parser;

/// Provision a Linux host to run macOS under KVM, then boot it.
#[derive(Debug, Parser)]
#[command(name = "kvmac")]
#[command(version)]
#[command(about = "Provision a Linux host for a macOS KVM guest and boot it")]
#[command(long_about = "Provision a Linux host for a macOS KVM guest and boot it.\n\n\
Must be run as root (via sudo). Installs missing packages, clones or updates \
the OSX-KVM toolkit, applies the KVM vendor profile, grants group access, \
prepares disk images, lets you adjust VM resources and finally hands off to \
the selected boot script.\n\n\
Environment: KVMAC_TOOLKIT_DIR, KVMAC_REPO_URL, KVMAC_BRANCH, \
KVMAC_MODPROBE_CONF, KVMAC_CONVERSION_GATE, RUST_LOG.")]
pub struct Cli {}
