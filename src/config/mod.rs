//! Configuration loading and merging
//!
//! Settings come from CLI flags, then a config file, then defaults.

pub mod loader;
pub mod merge;

pub use loader::{load_config, validate_config};
pub use merge::{merge_cli_with_config, CliOverrides};
