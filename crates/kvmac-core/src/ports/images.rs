//! Disk image tooling ports.
//!
//! The three collaborators of the asset pipeline. Each produces exactly one
//! artifact at a path chosen by the caller; existence checks are the
//! caller's business, not the adapter's.

use async_trait::async_trait;
use std::path::Path;

use super::ToolError;
use crate::domain::DiskSize;

/// Downloads the macOS base system image.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Run the toolkit's fetch utility so that `dest` exists afterwards.
    async fn fetch_base_image(&self, toolkit_dir: &Path, dest: &Path) -> Result<(), ToolError>;
}

/// Converts the downloaded image to a mountable raw image.
#[async_trait]
pub trait ImageConverter: Send + Sync {
    async fn convert(&self, source: &Path, dest: &Path) -> Result<(), ToolError>;
}

/// Creates an empty copy-on-write virtual disk.
#[async_trait]
pub trait DiskImageBuilder: Send + Sync {
    async fn create(&self, path: &Path, size: &DiskSize) -> Result<(), ToolError>;
}
