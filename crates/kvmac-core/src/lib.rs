#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use config::{ConfigError, HostIdentity, ProvisionConfig, validate_config};
pub use domain::{
    AssetOutcome, BootVariant, ConversionGate, CpuVendor, DependencyOutcome, DiskSize,
    HostConfigOutcome, MembershipOutcome, PendingChange, ProvisionReport, ResourceOutcome,
    StepStatus, SyncOutcome,
};
pub use error::ProvisionError;
pub use ports::{Operator, OperatorError, Ports, ScriptedOperator, ToolError};
pub use services::Provisioner;
