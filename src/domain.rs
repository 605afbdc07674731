//! Core data types shared by the walkers, filters and renderers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Number of entries the contents API returns per page when `per_page` is not sent.
///
/// A page holding exactly this many entries is taken to mean another page
/// follows. Directories whose size is an exact multiple of the page size
/// therefore cost one extra (empty) listing request.
pub const PAGE_SIZE: usize = 30;

/// Largest `per_page` the contents API honours.
pub const MAX_PAGE_SIZE: usize = 100;

/// Bring a page size into `1..=MAX_PAGE_SIZE`.
///
/// The listing request and the continuation check must agree on this value,
/// otherwise a short page is mistaken for the last one.
pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// One accepted, content-bearing file in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Forward-slash path relative to the traversal or repository root.
    pub path: String,
    /// Browsable URL (remote) or `file://` URI (local, opt-in).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, url: Option<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), url, content: content.into() }
    }
}

/// Why a candidate entry was left out of the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    BinaryExtension,
    Lockfile,
    VcsIgnored,
    Excluded,
    NotIncluded,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::BinaryExtension => "binary extension",
            SkipReason::Lockfile => "lockfile",
            SkipReason::VcsIgnored => "ignored",
            SkipReason::Excluded => "exclude pattern",
            SkipReason::NotIncluded => "include pattern",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters collected while building an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub files_included: usize,
    pub files_skipped_binary: usize,
    pub files_skipped_lockfile: usize,
    pub files_skipped_ignored: usize,
    pub files_skipped_excluded: usize,
    pub files_skipped_not_included: usize,
    pub directories_listed: usize,
    pub directories_skipped: usize,
    pub pages_requested: usize,
    pub fetch_failures: usize,
    pub read_failures: usize,
}

impl InventoryStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::BinaryExtension => self.files_skipped_binary += 1,
            SkipReason::Lockfile => self.files_skipped_lockfile += 1,
            SkipReason::VcsIgnored => self.files_skipped_ignored += 1,
            SkipReason::Excluded => self.files_skipped_excluded += 1,
            SkipReason::NotIncluded => self.files_skipped_not_included += 1,
        }
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped_binary
            + self.files_skipped_lockfile
            + self.files_skipped_ignored
            + self.files_skipped_excluded
            + self.files_skipped_not_included
    }

    pub fn failures(&self) -> usize {
        self.fetch_failures + self.read_failures
    }
}

impl fmt::Display for InventoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files included, {} skipped (binary: {}, lockfile: {}, ignored: {}, excluded: {}, not included: {}), {} failed",
            self.files_included,
            self.files_skipped(),
            self.files_skipped_binary,
            self.files_skipped_lockfile,
            self.files_skipped_ignored,
            self.files_skipped_excluded,
            self.files_skipped_not_included,
            self.failures()
        )
    }
}

/// Settings resolved from defaults, an optional config file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files must match this glob to be kept.
    pub include: Option<String>,
    /// Files matching this glob are dropped.
    pub exclude: Option<String>,
    pub api_base: String,
    pub page_size: usize,
    pub token: Option<String>,
    pub local_file_urls: bool,
    /// Abort the local walk on the first unreadable entry.
    pub strict: bool,
    pub follow_symlinks: bool,
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: PAGE_SIZE,
            token: None,
            local_file_urls: false,
            strict: false,
            follow_symlinks: true,
            respect_gitignore: true,
        }
    }
}
