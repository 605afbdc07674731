//! repo-gpt-scraper: flatten repositories into JSON file inventories
//!
//! Walks a GitHub repository through the contents API, or a local directory,
//! and writes every text file that survives the filters to a single JSON
//! document for language-model prompting.

use anyhow::Result;

fn main() -> Result<()> {
    repo_gpt_scraper::cli::run()
}
