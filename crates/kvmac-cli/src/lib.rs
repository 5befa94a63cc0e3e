#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod error;
pub mod parser;
pub mod presentation;
pub mod utils;

pub use bootstrap::{CliConfig, bootstrap};
pub use error::CliError;
pub use parser::Cli;
pub use utils::CliOperator;
