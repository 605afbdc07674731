//! Local directory traversal.
//!
//! Entries are visited depth-first in pre-order, in whatever order the
//! platform's directory listing returns them. No sorting is applied, so the
//! record order may differ between filesystems. `walkdir` keeps its own
//! stack of open directories, which bounds the call stack regardless of
//! nesting depth.

use super::ScanError;
use crate::domain::FileRecord;
use crate::filter::{Candidate, FilterSet, Verdict};
use crate::inventory::Inventory;
use crate::utils::relative_path;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks a directory tree and reads every file that survives the filters.
pub struct LocalWalker {
    root: PathBuf,
    follow_symlinks: bool,
    file_urls: bool,
    strict: bool,
}

impl LocalWalker {
    /// Create a walker with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), follow_symlinks: true, file_urls: false, strict: false }
    }

    /// Set whether to follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether records carry a `file://` URI
    pub fn file_urls(mut self, yes: bool) -> Self {
        self.file_urls = yes;
        self
    }

    /// Abort on the first unreadable entry instead of skipping it
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// Walk the tree under the root and collect accepted files.
    pub fn walk(&self, filters: &FilterSet) -> Result<Inventory, ScanError> {
        let root = self.root.canonicalize().map_err(|e| ScanError::io(&self.root, e))?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        let mut inventory = Inventory::new();
        inventory.stats_mut().directories_listed += 1;

        let mut entries =
            WalkDir::new(&root).min_depth(1).follow_links(self.follow_symlinks).into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    self.recover(&mut inventory, ScanError::Walk(e))?;
                    continue;
                }
            };

            let Some(rel_path) = relative_path(&root, entry.path()) else {
                tracing::warn!("Skipping non UTF-8 path: {}", entry.path().display());
                if entry.file_type().is_dir() {
                    entries.skip_current_dir();
                }
                continue;
            };
            let name = entry.file_name().to_string_lossy();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                match filters.check(&Candidate::dir(&name, &rel_path)) {
                    Verdict::Keep => inventory.stats_mut().directories_listed += 1,
                    Verdict::Skip(reason) => {
                        entries.skip_current_dir();
                        inventory.skip_dir(&rel_path, reason);
                    }
                }
                continue;
            }

            if !file_type.is_file() {
                tracing::debug!("Skipping special file or unfollowed link: {}", rel_path);
                continue;
            }

            if let Verdict::Skip(reason) = filters.check(&Candidate::file(&name, &rel_path)) {
                inventory.skip(&rel_path, reason);
                continue;
            }

            match fs::read(entry.path()) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes).into_owned();
                    let url = if self.file_urls { file_uri(entry.path()) } else { None };
                    inventory.push(FileRecord::new(rel_path, url, content));
                }
                Err(e) => self.recover(&mut inventory, ScanError::io(entry.path(), e))?,
            }
        }

        Ok(inventory)
    }

    fn recover(&self, inventory: &mut Inventory, err: ScanError) -> Result<(), ScanError> {
        if self.strict {
            return Err(err);
        }
        tracing::warn!("Skipping unreadable entry: {}", err);
        inventory.stats_mut().read_failures += 1;
        Ok(())
    }
}

fn file_uri(path: &Path) -> Option<String> {
    reqwest::Url::from_file_path(path).ok().map(|url| url.to_string())
}
