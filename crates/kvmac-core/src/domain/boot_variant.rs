//! Boot variants shipped by the toolkit and their tunable resources.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::assignments::read_assignment;

/// A launch configuration of the guest, backed by one script in the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BootVariant {
    pub file_name: &'static str,
    pub description: &'static str,
}

/// Known boot scripts, in menu order.
pub const BOOT_VARIANTS: [BootVariant; 6] = [
    BootVariant {
        file_name: "OpenCore-Boot.sh",
        description: "windowed QEMU display",
    },
    BootVariant {
        file_name: "boot-macOS-headless.sh",
        description: "headless, no display",
    },
    BootVariant {
        file_name: "boot-passthrough.sh",
        description: "GPU/USB passthrough",
    },
    BootVariant {
        file_name: "boot-macOS-vnc.sh",
        description: "display over VNC",
    },
    BootVariant {
        file_name: "boot-macOS-spice.sh",
        description: "display over SPICE",
    },
    BootVariant {
        file_name: "boot-macOS-ng.sh",
        description: "next-generation machine model",
    },
];

/// Look up a boot variant by exact file name.
pub fn find_variant(file_name: &str) -> Option<BootVariant> {
    BOOT_VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.file_name == file_name)
}

/// Names of all boot variants, in menu order.
pub fn variant_names() -> Vec<String> {
    BOOT_VARIANTS
        .iter()
        .map(|variant| variant.file_name.to_string())
        .collect()
}

/// A numeric resource setting stored in a boot script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceField {
    AllocatedRam,
    CpuSockets,
    CpuCores,
    CpuThreads,
}

impl ResourceField {
    pub const ALL: [Self; 4] = [
        Self::AllocatedRam,
        Self::CpuSockets,
        Self::CpuCores,
        Self::CpuThreads,
    ];

    /// Assignment key in the script.
    pub const fn key(self) -> &'static str {
        match self {
            Self::AllocatedRam => "ALLOCATED_RAM",
            Self::CpuSockets => "CPU_SOCKETS",
            Self::CpuCores => "CPU_CORES",
            Self::CpuThreads => "CPU_THREADS",
        }
    }

    /// Documented default applied when the operator enters nothing.
    pub const fn default_value(self) -> u32 {
        match self {
            Self::AllocatedRam => 4096,
            Self::CpuSockets => 1,
            Self::CpuCores => 2,
            Self::CpuThreads => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AllocatedRam => "Memory (MiB)",
            Self::CpuSockets => "CPU sockets",
            Self::CpuCores => "CPU cores",
            Self::CpuThreads => "CPU threads",
        }
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resource values as currently written in one boot script.
///
/// Values are kept as text: a field the script does not define is `None`,
/// and whatever the toolkit ships is shown verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSettings {
    pub allocated_ram: Option<String>,
    pub cpu_sockets: Option<String>,
    pub cpu_cores: Option<String>,
    pub cpu_threads: Option<String>,
}

impl ResourceSettings {
    /// Extract the four fields from script text by exact key.
    pub fn parse(text: &str) -> Self {
        let read = |field: ResourceField| read_assignment(text, field.key()).map(str::to_string);
        Self {
            allocated_ram: read(ResourceField::AllocatedRam),
            cpu_sockets: read(ResourceField::CpuSockets),
            cpu_cores: read(ResourceField::CpuCores),
            cpu_threads: read(ResourceField::CpuThreads),
        }
    }

    pub fn get(&self, field: ResourceField) -> Option<&str> {
        match field {
            ResourceField::AllocatedRam => self.allocated_ram.as_deref(),
            ResourceField::CpuSockets => self.cpu_sockets.as_deref(),
            ResourceField::CpuCores => self.cpu_cores.as_deref(),
            ResourceField::CpuThreads => self.cpu_threads.as_deref(),
        }
    }
}

/// An edit requested during the interactive loop, applied after it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub file_name: String,
    pub ram: u32,
    pub sockets: u32,
    pub cores: u32,
    pub threads: u32,
}

impl PendingChange {
    pub fn new(file_name: impl Into<String>, ram: u32, sockets: u32, cores: u32, threads: u32) -> Self {
        Self {
            file_name: file_name.into(),
            ram,
            sockets,
            cores,
            threads,
        }
    }

    pub const fn value(&self, field: ResourceField) -> u32 {
        match field {
            ResourceField::AllocatedRam => self.ram,
            ResourceField::CpuSockets => self.sockets,
            ResourceField::CpuCores => self.cores,
            ResourceField::CpuThreads => self.threads,
        }
    }
}

/// Result of the resource customization step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutcome {
    /// Changes written to disk, in application order.
    pub applied: Vec<PendingChange>,
    /// Listed files that were selected but do not exist in the checkout.
    pub missing_files: Vec<String>,
}
