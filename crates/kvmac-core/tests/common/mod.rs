//! Shared fakes for kvmac-core integration tests.
//!
//! `FakeHost` implements every host port against in-memory state plus a
//! temporary directory, and records each mutating call so tests can assert
//! exactly what a run did.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kvmac_core::domain::{
    BASE_IMAGE, DiskSize, MOUNTABLE_IMAGE, REPOSITORY_MARKER, VIRTUAL_DISK,
};
use kvmac_core::ports::{
    AccountManager, DiskImageBuilder, ImageConverter, ImageFetcher, PackageManager, Ports,
    ProcessLauncher, VersionControl,
};
use kvmac_core::{HostIdentity, ProvisionConfig, ScriptedOperator, ToolError};
use tempfile::TempDir;

/// Boot script body shipped by the fake toolkit.
pub const BOOT_SCRIPT: &str = "#!/usr/bin/env bash\n\
# Special thanks to the OSX-KVM contributors\n\
ALLOCATED_RAM=\"7192\" # MiB\n\
CPU_SOCKETS=\"1\"\n\
CPU_CORES=\"2\"\n\
CPU_THREADS=\"4\"\n\
\n\
REPO_PATH=\"./\"\n\
args=( -m \"$ALLOCATED_RAM\" -smp \"$CPU_THREADS\",cores=\"$CPU_CORES\",sockets=\"$CPU_SOCKETS\" )\n";

pub const INTEL_TEMPLATE: &str = "options kvm_intel nested=1\noptions kvm ignore_msrs=1\n";
pub const AMD_TEMPLATE: &str = "options kvm_amd nested=1\noptions kvm ignore_msrs=1\n";

#[derive(Debug, Default)]
pub struct HostState {
    pub installed: Vec<String>,
    pub groups: Vec<String>,
    pub local_commit: String,
    pub remote_commit: String,
    pub fail_clone: bool,
    pub empty_clone: bool,
    pub fail_fetch: bool,
    pub fail_install: bool,
    pub calls: Vec<String>,
}

/// In-memory host backing every port.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub state: Mutex<HostState>,
}

impl FakeHost {
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

/// Lay out a toolkit checkout the way the real repository looks.
pub fn populate_toolkit(dir: &Path) {
    fs::create_dir_all(dir.join(REPOSITORY_MARKER)).unwrap();
    fs::write(dir.join("kvm.conf"), INTEL_TEMPLATE).unwrap();
    fs::write(dir.join("kvm_amd.conf"), AMD_TEMPLATE).unwrap();
    for variant in kvmac_core::domain::BOOT_VARIANTS {
        fs::write(dir.join(variant.file_name), BOOT_SCRIPT).unwrap();
    }
}

#[async_trait]
impl PackageManager for FakeHost {
    async fn is_installed(&self, package: &str) -> Result<bool, ToolError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .installed
            .iter()
            .any(|p| p == package))
    }

    async fn refresh_index(&self) -> Result<(), ToolError> {
        self.record("refresh".into());
        Ok(())
    }

    async fn install(&self, packages: &[String]) -> Result<(), ToolError> {
        self.record(format!("install {}", packages.join(" ")));
        let mut state = self.state.lock().unwrap();
        if state.fail_install {
            return Err(ToolError::failed("apt-get", Some(100), "Unable to locate package"));
        }
        state.installed.extend(packages.iter().cloned());
        Ok(())
    }
}

#[async_trait]
impl VersionControl for FakeHost {
    async fn clone_shallow(&self, _url: &str, _branch: &str, dest: &Path) -> Result<(), ToolError> {
        self.record("clone".into());
        let (fail, empty) = {
            let state = self.state.lock().unwrap();
            (state.fail_clone, state.empty_clone)
        };
        if fail {
            return Err(ToolError::failed("git", Some(128), "repository not found"));
        }
        if !empty {
            populate_toolkit(dest);
        }
        Ok(())
    }

    async fn fetch(&self, _repo: &Path, _branch: &str) -> Result<(), ToolError> {
        self.record("fetch".into());
        if self.state.lock().unwrap().fail_fetch {
            return Err(ToolError::failed("git", Some(128), "Could not resolve host"));
        }
        Ok(())
    }

    async fn head_commit(&self, _repo: &Path) -> Result<String, ToolError> {
        Ok(self.state.lock().unwrap().local_commit.clone())
    }

    async fn remote_commit(&self, _repo: &Path, _branch: &str) -> Result<String, ToolError> {
        Ok(self.state.lock().unwrap().remote_commit.clone())
    }

    async fn pull(&self, _repo: &Path, _branch: &str) -> Result<(), ToolError> {
        self.record("pull".into());
        let mut state = self.state.lock().unwrap();
        state.local_commit = state.remote_commit.clone();
        Ok(())
    }
}

#[async_trait]
impl AccountManager for FakeHost {
    async fn groups_of(&self, _user: &str) -> Result<Vec<String>, ToolError> {
        Ok(self.state.lock().unwrap().groups.clone())
    }

    async fn add_to_group(&self, _user: &str, group: &str) -> Result<(), ToolError> {
        self.record(format!("usermod {group}"));
        let mut state = self.state.lock().unwrap();
        if !state.groups.iter().any(|g| g == group) {
            state.groups.push(group.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl ImageFetcher for FakeHost {
    async fn fetch_base_image(&self, _toolkit_dir: &Path, dest: &Path) -> Result<(), ToolError> {
        self.record("fetch-image".into());
        fs::write(dest, b"dmg").unwrap();
        Ok(())
    }
}

#[async_trait]
impl ImageConverter for FakeHost {
    async fn convert(&self, _source: &Path, dest: &Path) -> Result<(), ToolError> {
        self.record("dmg2img".into());
        fs::write(dest, b"img").unwrap();
        Ok(())
    }
}

#[async_trait]
impl DiskImageBuilder for FakeHost {
    async fn create(&self, path: &Path, size: &DiskSize) -> Result<(), ToolError> {
        self.record(format!("qemu-img {size}"));
        fs::write(path, b"qcow2").unwrap();
        Ok(())
    }
}

#[async_trait]
impl ProcessLauncher for FakeHost {
    async fn hand_off(&self, script: &Path, _working_dir: &Path) -> Result<(), ToolError> {
        let name = script.file_name().unwrap().to_string_lossy().into_owned();
        self.record(format!("launch {name}"));
        Ok(())
    }
}

/// A temporary home directory plus configuration pointing into it.
pub struct Sandbox {
    pub dir: TempDir,
    pub config: ProvisionConfig,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ProvisionConfig::with_defaults(HostIdentity::new("alice", dir.path(), true))
            .with_modprobe_conf(dir.path().join("etc/modprobe.d/kvm.conf"))
            .with_cpuinfo_path(dir.path().join("cpuinfo"));
        Self { dir, config }
    }

    pub fn toolkit(&self) -> PathBuf {
        self.config.toolkit_dir.clone()
    }

    pub fn read_toolkit_file(&self, name: &str) -> String {
        fs::read_to_string(self.config.toolkit_file(name)).unwrap()
    }
}

/// A host on which a previous run already did everything.
pub fn converged_host(sandbox: &Sandbox) -> Arc<FakeHost> {
    let toolkit = sandbox.toolkit();
    populate_toolkit(&toolkit);
    for name in [BASE_IMAGE, MOUNTABLE_IMAGE, VIRTUAL_DISK] {
        fs::write(toolkit.join(name), b"existing").unwrap();
    }
    let modprobe = &sandbox.config.modprobe_conf;
    fs::create_dir_all(modprobe.parent().unwrap()).unwrap();
    fs::write(modprobe, INTEL_TEMPLATE).unwrap();

    let host = FakeHost::default();
    {
        let mut state = host.state.lock().unwrap();
        state.installed = sandbox.config.packages.clone();
        state.groups = vec!["alice".into(), "kvm".into(), "libvirt".into(), "input".into()];
        state.local_commit = "c0ffee0000".into();
        state.remote_commit = "c0ffee0000".into();
    }
    Arc::new(host)
}

/// Wire every port to `host`, with `operator` answering questions.
pub fn ports(host: &Arc<FakeHost>, operator: &Arc<ScriptedOperator>) -> Ports {
    Ports {
        packages: host.clone(),
        vcs: host.clone(),
        accounts: host.clone(),
        fetcher: host.clone(),
        converter: host.clone(),
        disk_builder: host.clone(),
        launcher: host.clone(),
        operator: operator.clone(),
    }
}
