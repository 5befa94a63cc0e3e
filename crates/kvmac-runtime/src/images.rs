//! Disk image tool adapters: the toolkit's fetch script, `dmg2img` and
//! `qemu-img`.

use std::path::Path;

use async_trait::async_trait;
use kvmac_core::ToolError;
use kvmac_core::domain::DiskSize;
use kvmac_core::ports::{DiskImageBuilder, ImageConverter, ImageFetcher};
use tracing::info;

use crate::command::{command, run_attached, run_captured};

/// Fetch utility shipped at the top of the toolkit checkout.
pub const FETCH_SCRIPT: &str = "fetch-macOS-v2.py";

/// Runs the toolkit's interactive recovery image downloader.
///
/// The script asks the operator which macOS release to fetch, so it runs
/// attached to the terminal with the toolkit as working directory.
#[derive(Debug, Clone, Default)]
pub struct FetchScript;

#[async_trait]
impl ImageFetcher for FetchScript {
    async fn fetch_base_image(&self, toolkit_dir: &Path, dest: &Path) -> Result<(), ToolError> {
        let mut cmd = command("python3", [FETCH_SCRIPT]);
        cmd.current_dir(toolkit_dir);
        run_attached("python3", cmd).await?;
        info!(dest = %dest.display(), "Fetch script finished");
        Ok(())
    }
}

/// `dmg2img` converter.
#[derive(Debug, Clone, Default)]
pub struct Dmg2Img;

#[async_trait]
impl ImageConverter for Dmg2Img {
    async fn convert(&self, source: &Path, dest: &Path) -> Result<(), ToolError> {
        let mut cmd = command("dmg2img", ["-i"]);
        cmd.arg(source).arg(dest);
        run_captured("dmg2img", cmd).await?;
        Ok(())
    }
}

/// `qemu-img` qcow2 disk builder.
#[derive(Debug, Clone, Default)]
pub struct QemuImg;

/// Arguments for creating a qcow2 disk at `path`.
pub fn qcow2_create_args(path: &Path, size: &DiskSize) -> Vec<String> {
    vec![
        "create".to_string(),
        "-f".to_string(),
        "qcow2".to_string(),
        path.display().to_string(),
        size.to_string(),
    ]
}

#[async_trait]
impl DiskImageBuilder for QemuImg {
    async fn create(&self, path: &Path, size: &DiskSize) -> Result<(), ToolError> {
        let cmd = command("qemu-img", qcow2_create_args(path, size));
        run_captured("qemu-img", cmd).await?;
        info!(path = %path.display(), %size, "Created virtual disk");
        Ok(())
    }
}
