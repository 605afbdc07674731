//! Local directory scanning

use std::path::PathBuf;
use thiserror::Error;

pub mod local;

pub use local::LocalWalker;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io { path: path.into(), source }
    }
}

