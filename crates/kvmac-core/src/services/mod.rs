//! Core services - the provisioning steps.
//!
//! Each service owns one step and talks to the host only through ports.
//! [`Provisioner`] composes them in their fixed order.

mod assets;
mod dependencies;
mod groups;
mod host_config;
mod launcher;
mod provisioner;
mod repository_sync;
mod resources;

pub use assets::AssetPipeline;
pub use dependencies::DependencyChecker;
pub use groups::GroupManager;
pub use host_config::HostConfigurator;
pub use launcher::{Launcher, resolve_selection};
pub use provisioner::Provisioner;
pub use repository_sync::RepositorySynchronizer;
pub use resources::{
    ResourceCustomizer, VariantSettings, apply_changes, read_current, settings_table,
};
