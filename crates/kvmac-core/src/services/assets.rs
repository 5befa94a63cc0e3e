//! Asset pipeline - recovery image, mountable image and guest disk.
//!
//! Each artifact is gated on its own existence check, and a failed step is
//! recorded without stopping the steps after it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ProvisionConfig;
use crate::domain::{
    AssetOutcome, BASE_IMAGE, ConversionGate, DEFAULT_DISK_SIZE, DiskSize, MOUNTABLE_IMAGE,
    StepStatus, VIRTUAL_DISK,
};
use crate::error::ProvisionError;
use crate::ports::{DiskImageBuilder, ImageConverter, ImageFetcher, Operator, ToolError};

/// Service producing the disk images the guest boots from.
pub struct AssetPipeline {
    fetcher: Arc<dyn ImageFetcher>,
    converter: Arc<dyn ImageConverter>,
    builder: Arc<dyn DiskImageBuilder>,
    operator: Arc<dyn Operator>,
}

impl AssetPipeline {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        converter: Arc<dyn ImageConverter>,
        builder: Arc<dyn DiskImageBuilder>,
        operator: Arc<dyn Operator>,
    ) -> Self {
        Self {
            fetcher,
            converter,
            builder,
            operator,
        }
    }

    /// Run fetch, convert and create in order.
    ///
    /// Only operator failures are returned as errors; tool failures end up in
    /// the outcome.
    pub async fn ensure(&self, config: &ProvisionConfig) -> Result<AssetOutcome, ProvisionError> {
        let base = config.toolkit_file(BASE_IMAGE);
        let mountable = config.toolkit_file(MOUNTABLE_IMAGE);
        let disk = config.toolkit_file(VIRTUAL_DISK);

        let base_image = self.fetch_base_image(&config.toolkit_dir, &base).await;
        let mountable_image = self
            .convert_base_image(config.conversion_gate, &base, &mountable)
            .await;
        let virtual_disk = self.create_virtual_disk(&disk).await?;

        Ok(AssetOutcome {
            base_image,
            mountable_image,
            virtual_disk,
        })
    }

    async fn fetch_base_image(&self, toolkit_dir: &Path, base: &Path) -> StepStatus {
        if base.exists() {
            debug!(path = %base.display(), "Base image present");
            return StepStatus::Skipped;
        }

        self.operator
            .info("Fetching the macOS recovery image (choose a release when asked)...");
        let result = self.fetcher.fetch_base_image(toolkit_dir, base).await;
        self.finish("fetch", base, result)
    }

    async fn convert_base_image(
        &self,
        gate: ConversionGate,
        base: &Path,
        mountable: &Path,
    ) -> StepStatus {
        match gate {
            ConversionGate::OutputAbsent if mountable.exists() => {
                debug!(path = %mountable.display(), "Mountable image present");
                return StepStatus::Skipped;
            }
            ConversionGate::SourceAbsent if base.exists() => {
                debug!("Base image present, conversion gated off");
                return StepStatus::Skipped;
            }
            ConversionGate::SourceAbsent if mountable.exists() => {
                return StepStatus::Skipped;
            }
            _ => {}
        }

        if !base.exists() {
            let reason = format!("{} is missing", base.display());
            warn!(%reason, "Cannot convert base image");
            self.operator
                .warn(&format!("Skipping conversion: {reason}"));
            return StepStatus::Failed(reason);
        }

        self.operator.info("Converting the recovery image...");
        let result = self.converter.convert(base, mountable).await;
        self.finish("convert", mountable, result)
    }

    async fn create_virtual_disk(&self, disk: &Path) -> Result<StepStatus, ProvisionError> {
        if disk.exists() {
            debug!(path = %disk.display(), "Virtual disk present");
            return Ok(StepStatus::Skipped);
        }

        let size = self.ask_disk_size()?;
        self.operator
            .info(&format!("Creating a {size} virtual disk..."));
        let result = self.builder.create(disk, &size).await;
        Ok(self.finish("create", disk, result))
    }

    fn ask_disk_size(&self) -> Result<DiskSize, ProvisionError> {
        loop {
            let answer = self
                .operator
                .text("Virtual disk size", Some(DEFAULT_DISK_SIZE))?;
            match answer.parse::<DiskSize>() {
                Ok(size) => return Ok(size),
                Err(e) => self.operator.warn(&e.to_string()),
            }
        }
    }

    /// Turn a tool result into a step status, double-checking the artifact.
    fn finish(&self, step: &str, artifact: &Path, result: Result<(), ToolError>) -> StepStatus {
        match result {
            Ok(()) if artifact.exists() => {
                info!(step, path = %artifact.display(), "Created artifact");
                self.operator
                    .info(&format!("✓ Created {}", artifact.display()));
                StepStatus::Created
            }
            Ok(()) => {
                let reason = format!("{} was not produced", artifact.display());
                warn!(step, %reason, "Asset step finished without its artifact");
                self.operator.warn(&reason);
                StepStatus::Failed(reason)
            }
            Err(e) => {
                warn!(step, error = %e, "Asset step failed");
                self.operator.warn(&format!("Asset step '{step}' failed: {e}"));
                StepStatus::Failed(e.to_string())
            }
        }
    }
}
