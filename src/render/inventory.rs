//! Inventory JSON document.

use crate::domain::FileRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Serialize records as a pretty-printed JSON array of `{path, url?, content}`.
pub fn render_inventory(records: &[FileRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn write_inventory(output_path: &Path, records: &[FileRecord]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating output directory: {}", parent.display()))?;
    }
    std::fs::write(output_path, render_inventory(records)?)
        .with_context(|| format!("Failed writing inventory: {}", output_path.display()))?;
    Ok(())
}
