//! Config file loading

use crate::domain::{Config, MAX_PAGE_SIZE};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const SECTION: &str = "repo-gpt-scraper";

const CANDIDATES: &[&str] = &[
    "repo-gpt-scraper.toml",
    ".repo-gpt-scraper.toml",
    "repo-gpt-scraper.yml",
    ".repo-gpt-scraper.yml",
    "repo-gpt-scraper.yaml",
    ".repo-gpt-scraper.yaml",
];

/// Load the config named by `config_path`, or the first one discovered in `dir`.
///
/// An explicit file that cannot be parsed is an error. A discovered one is
/// reported and replaced by the defaults.
pub fn load_config(dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();

    let Some(config_file) = config_path.map(Path::to_path_buf).or_else(|| discover_config(dir))
    else {
        return Ok(Config::default());
    };

    match read_config(&config_file) {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if !explicit => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", config_file.display(), e);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn read_config(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let config = match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file)?,
        "yaml" | "yml" => parse_yaml_config(&content, config_file)?,
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    };
    validate_config(&config)
        .with_context(|| format!("Invalid config: {}", config_file.display()))?;
    Ok(config)
}

/// Reject values the contents API cannot serve.
pub fn validate_config(config: &Config) -> Result<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&config.page_size) {
        anyhow::bail!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE,
            config.page_size
        );
    }
    Ok(())
}

/// Parse TOML config, with keys at the top level or under `[repo-gpt-scraper]`.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, with keys at the top level or under `repo-gpt-scraper:`.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty document parses as null.
    if raw.is_null() {
        return Ok(Config::default());
    }

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| dir.join(candidate)).find(|path| path.is_file())
}
