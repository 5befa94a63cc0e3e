#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod accounts;
pub mod apt;
mod command;
pub mod git;
pub mod identity;
pub mod images;
pub mod launcher;

use std::sync::Arc;

use kvmac_core::ports::{Operator, Ports};

pub use accounts::UsermodAccounts;
pub use apt::AptPackageManager;
pub use git::GitCli;
pub use identity::{IdentityError, detect_identity};
pub use images::{Dmg2Img, FetchScript, QemuImg};
pub use launcher::ExecLauncher;

/// Wire every port to its host tool, with `operator` answering questions.
pub fn build_ports(operator: Arc<dyn Operator>, show_progress: bool) -> Ports {
    Ports {
        packages: Arc::new(AptPackageManager::new()),
        vcs: Arc::new(GitCli::new().with_progress(show_progress)),
        accounts: Arc::new(UsermodAccounts),
        fetcher: Arc::new(FetchScript),
        converter: Arc::new(Dmg2Img),
        disk_builder: Arc::new(QemuImg),
        launcher: Arc::new(ExecLauncher),
        operator,
    }
}
