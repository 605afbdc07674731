//! Shared helpers.

pub mod paths;

pub use paths::{normalize_path, relative_path};
