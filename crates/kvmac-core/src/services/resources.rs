//! Resource customizer - memory and CPU settings of the boot scripts.
//!
//! Three phases: show the current values, collect edits in a loop, then
//! apply every edit in the order it was entered. Applying rewrites only the
//! value on the line whose key matches exactly; everything else in the
//! script is preserved byte-for-byte.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    BOOT_VARIANTS, BootVariant, PendingChange, ResourceField, ResourceOutcome, ResourceSettings,
    find_variant, set_assignment, variant_names,
};
use crate::error::ProvisionError;
use crate::ports::Operator;

/// Current settings of one boot script found in the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSettings {
    pub variant: BootVariant,
    pub settings: ResourceSettings,
}

/// Service editing resource assignments in the toolkit's boot scripts.
pub struct ResourceCustomizer {
    operator: Arc<dyn Operator>,
}

impl ResourceCustomizer {
    pub fn new(operator: Arc<dyn Operator>) -> Self {
        Self { operator }
    }

    /// Show, collect and apply resource edits.
    pub fn customize(&self, toolkit_dir: &Path) -> Result<ResourceOutcome, ProvisionError> {
        let current = read_current(toolkit_dir)?;
        for line in settings_table(&current) {
            self.operator.info(&line);
        }

        let changes = self.collect_changes()?;
        if changes.is_empty() {
            debug!("No resource changes requested");
            return Ok(ResourceOutcome::default());
        }

        self.operator.info("Pending changes:");
        for change in &changes {
            self.operator.info(&format!(
                "  {}: RAM {} MiB, {} socket(s), {} core(s), {} thread(s)",
                change.file_name, change.ram, change.sockets, change.cores, change.threads
            ));
        }

        apply_changes(toolkit_dir, &changes, self.operator.as_ref())
    }

    /// Ask for edits until the operator declines to make more.
    ///
    /// An unknown file name is rejected with a warning and the loop starts
    /// over. Empty numeric answers take the documented defaults.
    pub fn collect_changes(&self) -> Result<Vec<PendingChange>, ProvisionError> {
        let names = variant_names();
        let mut changes = Vec::new();

        while self
            .operator
            .confirm("Change memory or CPU settings of a boot script?", false)?
        {
            let answer = self.operator.choose("Boot script to edit", &names)?;
            let Some(variant) = find_variant(&answer) else {
                self.operator.warn(&format!(
                    "'{answer}' is not one of: {}",
                    names.join(", ")
                ));
                continue;
            };

            let mut values = [0u32; 4];
            for (slot, field) in values.iter_mut().zip(ResourceField::ALL) {
                *slot = self.operator.number(
                    &format!("{} [{}]", field.label(), field.default_value()),
                    field.default_value(),
                )?;
            }
            let [ram, sockets, cores, threads] = values;

            debug!(file = variant.file_name, ram, sockets, cores, threads, "Queued resource change");
            changes.push(PendingChange::new(variant.file_name, ram, sockets, cores, threads));
        }

        Ok(changes)
    }
}

/// Read the settings of every known boot script present in `toolkit_dir`.
pub fn read_current(toolkit_dir: &Path) -> Result<Vec<VariantSettings>, ProvisionError> {
    let mut found = Vec::new();
    for variant in BOOT_VARIANTS {
        let path = toolkit_dir.join(variant.file_name);
        if !path.is_file() {
            debug!(path = %path.display(), "Boot script not present");
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|e| ProvisionError::io(&path, e))?;
        found.push(VariantSettings {
            variant,
            settings: ResourceSettings::parse(&text),
        });
    }
    Ok(found)
}

/// Render current settings as aligned text rows.
pub fn settings_table(rows: &[VariantSettings]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No boot scripts found in the toolkit.".to_string()];
    }

    let width = rows
        .iter()
        .map(|row| row.variant.file_name.len())
        .max()
        .unwrap_or(0)
        .max("SCRIPT".len());

    let mut lines = vec![format!(
        "{:<width$}  {:>8}  {:>7}  {:>5}  {:>7}",
        "SCRIPT", "RAM", "SOCKETS", "CORES", "THREADS"
    )];
    for row in rows {
        let value = |field| row.settings.get(field).unwrap_or("-");
        lines.push(format!(
            "{:<width$}  {:>8}  {:>7}  {:>5}  {:>7}",
            row.variant.file_name,
            value(ResourceField::AllocatedRam),
            value(ResourceField::CpuSockets),
            value(ResourceField::CpuCores),
            value(ResourceField::CpuThreads),
        ));
    }
    lines
}

/// Apply `changes` in order; a later change to the same file wins.
///
/// Files that do not exist are reported in the outcome. Keys a script does
/// not define are left out rather than inserted.
pub fn apply_changes(
    toolkit_dir: &Path,
    changes: &[PendingChange],
    operator: &dyn Operator,
) -> Result<ResourceOutcome, ProvisionError> {
    let mut outcome = ResourceOutcome::default();

    for change in changes {
        let path = toolkit_dir.join(&change.file_name);
        if !path.is_file() {
            warn!(path = %path.display(), "Boot script missing, change skipped");
            operator.warn(&format!("{} does not exist, skipping", change.file_name));
            outcome.missing_files.push(change.file_name.clone());
            continue;
        }

        let original = fs::read_to_string(&path).map_err(|e| ProvisionError::io(&path, e))?;
        let mut text = original.clone();
        for field in ResourceField::ALL {
            let (updated, replaced) = set_assignment(&text, field.key(), &change.value(field).to_string());
            if !replaced {
                operator.warn(&format!("{} has no {} setting", change.file_name, field.key()));
            }
            text = updated;
        }

        if text != original {
            fs::write(&path, &text).map_err(|e| ProvisionError::io(&path, e))?;
        }
        info!(file = %change.file_name, "Applied resource change");
        operator.info(&format!("✓ Updated {}", change.file_name));
        outcome.applied.push(change.clone());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ScriptedOperator;

    const SCRIPT: &str = "#!/usr/bin/env bash\n\
ALLOCATED_RAM=\"7192\" # MiB\n\
CPU_SOCKETS=\"1\"\n\
CPU_CORES=\"2\"\n\
CPU_THREADS=\"4\"\n\
\n\
args=( -m \"$ALLOCATED_RAM\" )\n";

    #[test]
    fn test_read_current_lists_present_scripts_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("OpenCore-Boot.sh"), SCRIPT).unwrap();

        let rows = read_current(dir.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variant.file_name, "OpenCore-Boot.sh");
        assert_eq!(rows[0].settings.get(ResourceField::AllocatedRam), Some("7192"));
    }

    #[test]
    fn test_settings_table_shows_dash_for_missing() {
        let rows = vec![VariantSettings {
            variant: BOOT_VARIANTS[0],
            settings: ResourceSettings::parse("CPU_CORES=\"8\"\n"),
        }];
        let lines = settings_table(&rows);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("OpenCore-Boot.sh"));
        assert!(lines[1].contains('8'));
        assert!(lines[1].contains('-'));
    }

    #[test]
    fn test_collect_rejects_unknown_file_and_uses_defaults() {
        let op = ScriptedOperator::new(["y", "evil.sh", "y", "OpenCore-Boot.sh", "", "", "", "", "n"]);
        let changes = ResourceCustomizer::new(Arc::new(op)).collect_changes().unwrap();
        assert_eq!(
            changes,
            vec![PendingChange::new("OpenCore-Boot.sh", 4096, 1, 2, 4)]
        );
    }

    #[test]
    fn test_apply_preserves_surrounding_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OpenCore-Boot.sh");
        fs::write(&path, SCRIPT).unwrap();
        let op = ScriptedOperator::default();

        let changes = [PendingChange::new("OpenCore-Boot.sh", 8192, 1, 4, 8)];
        let outcome = apply_changes(dir.path(), &changes, &op).unwrap();

        assert_eq!(outcome.applied.len(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            SCRIPT
                .replace("\"7192\"", "\"8192\"")
                .replace("CPU_CORES=\"2\"", "CPU_CORES=\"4\"")
                .replace("CPU_THREADS=\"4\"", "CPU_THREADS=\"8\"")
        );
    }

    #[test]
    fn test_apply_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let op = ScriptedOperator::default();

        let changes = [PendingChange::new("boot-macOS-ng.sh", 4096, 1, 2, 4)];
        let outcome = apply_changes(dir.path(), &changes, &op).unwrap();
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.missing_files, vec!["boot-macOS-ng.sh"]);
        assert!(!dir.path().join("boot-macOS-ng.sh").exists());
    }
}
