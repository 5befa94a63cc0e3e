//! Domain types for host provisioning.
//!
//! Pure data and text logic only. Anything that talks to the host goes
//! through a port in [`crate::ports`].

pub mod assets;
pub mod assignments;
pub mod boot_variant;
pub mod groups;
pub mod packages;
pub mod report;
pub mod repository;
pub mod vendor;

pub use assets::{
    AssetOutcome, BASE_IMAGE, ConversionGate, DEFAULT_DISK_SIZE, DiskSize, DiskSizeError,
    MOUNTABLE_IMAGE, StepStatus, VIRTUAL_DISK,
};
pub use assignments::{read_assignment, set_assignment};
pub use boot_variant::{
    BOOT_VARIANTS, BootVariant, PendingChange, ResourceField, ResourceOutcome, ResourceSettings,
    find_variant, variant_names,
};
pub use groups::{MembershipOutcome, REQUIRED_GROUPS, missing_groups};
pub use packages::{DependencyOutcome, PackageRequirement, REQUIRED_PACKAGES, missing_packages};
pub use report::ProvisionReport;
pub use repository::{REPOSITORY_MARKER, RepositoryState, SyncOutcome};
pub use vendor::{CpuVendor, HostConfigOutcome};
