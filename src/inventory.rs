//! Ordered accumulation of file records.

use crate::domain::{FileRecord, InventoryStats, SkipReason};

/// Records in discovery order together with the walk's counters.
///
/// Records are only ever appended: no sorting, deduplication or capping.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<FileRecord>,
    stats: InventoryStats,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FileRecord) {
        self.stats.files_included += 1;
        self.records.push(record);
    }

    /// Append everything from `other`, keeping its order after ours.
    pub fn extend(&mut self, other: Inventory) {
        let Inventory { records, stats } = other;
        self.records.extend(records);
        let totals = &mut self.stats;
        totals.files_included += stats.files_included;
        totals.files_skipped_binary += stats.files_skipped_binary;
        totals.files_skipped_lockfile += stats.files_skipped_lockfile;
        totals.files_skipped_ignored += stats.files_skipped_ignored;
        totals.files_skipped_excluded += stats.files_skipped_excluded;
        totals.files_skipped_not_included += stats.files_skipped_not_included;
        totals.directories_listed += stats.directories_listed;
        totals.directories_skipped += stats.directories_skipped;
        totals.pages_requested += stats.pages_requested;
        totals.fetch_failures += stats.fetch_failures;
        totals.read_failures += stats.read_failures;
    }

    pub fn skip(&mut self, path: &str, reason: SkipReason) {
        tracing::debug!("Skipping {} ({})", path, reason);
        self.stats.record_skip(reason);
    }

    /// Record a pruned directory; nothing below it is visited.
    pub fn skip_dir(&mut self, path: &str, reason: SkipReason) {
        tracing::debug!("Skipping directory {} ({})", path, reason);
        self.stats.directories_skipped += 1;
    }

    pub fn stats(&self) -> &InventoryStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut InventoryStats {
        &mut self.stats
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn paths(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
