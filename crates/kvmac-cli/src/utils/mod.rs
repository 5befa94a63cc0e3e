//! Utility modules for the CLI.

pub mod input;

pub use input::CliOperator;
