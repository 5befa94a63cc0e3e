//! Presentation layer for CLI output.

pub mod summary;

pub use summary::{banner_lines, print_banner, print_report, print_separator};
