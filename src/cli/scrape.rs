//! Scrape command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{load_config, merge_cli_with_config, validate_config, CliOverrides};
use crate::domain::Config;
use crate::fetch::{fetch_repository, GithubClient};
use crate::filter::{FilterSet, IgnoreMatcher};
use crate::inventory::Inventory;
use crate::render::write_inventory;
use crate::scan::LocalWalker;

#[derive(Args)]
pub struct ScrapeArgs {
    /// URL of the GitHub repository to scrape (defaults to the local directory)
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// Output file name (relative paths resolve against the working directory)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub out: PathBuf,

    /// Files must match this glob pattern to be included
    #[arg(short = 'i', long, value_name = "GLOB")]
    pub include: Option<String>,

    /// Files matching this glob pattern will be excluded
    #[arg(short = 'e', long, value_name = "GLOB")]
    pub exclude: Option<String>,

    /// Local directory to scrape when no URL is given
    #[arg(short = 'd', long, value_name = "PATH", conflicts_with = "url")]
    pub dir: Option<PathBuf>,

    /// Path to config file (repo-gpt-scraper.toml or .yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Entries per listing page; a full page means another page follows
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..=100))]
    pub page_size: Option<u64>,

    /// Token for authenticated API requests
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Attach file:// URIs to local records
    #[arg(long)]
    pub local_urls: bool,

    /// Abort on the first unreadable local file
    #[arg(long)]
    pub strict: bool,

    /// Do not follow symbolic links when scraping a local directory
    #[arg(long)]
    pub no_follow_symlinks: bool,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,
}

impl ScrapeArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            api_base: self.api_base.clone(),
            page_size: self.page_size.map(|n| n as usize),
            token: self.token.clone(),
            local_file_urls: self.local_urls,
            strict: self.strict,
            no_follow_symlinks: self.no_follow_symlinks,
            no_gitignore: self.no_gitignore,
        }
    }
}

pub fn run(args: ScrapeArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed resolving working directory")?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let config = merge_cli_with_config(file_config, args.overrides());
    validate_config(&config)?;

    tracing::info!(
        include = config.include.as_deref().unwrap_or(""),
        exclude = config.exclude.as_deref().unwrap_or(""),
        "Filter patterns"
    );

    let inventory = match args.url.as_deref() {
        Some(url) => {
            tracing::info!(backend = "github", api_base = %config.api_base, "Selected backend");
            println!("Scraping GitHub repository from URL {url}");
            scrape_remote(url, &config)?
        }
        None => {
            let dir = args.dir.clone().unwrap_or_else(|| cwd.clone());
            tracing::info!(backend = "local", dir = %dir.display(), "Selected backend");
            println!("Scraping local repo within dir {}", dir.display());
            scrape_local(&dir, &config)?
        }
    };

    let output_path = cwd.join(&args.out);
    write_inventory(&output_path, inventory.records())?;

    println!("Data written to {}", output_path.display());
    println!("{}", inventory.stats());
    Ok(())
}

fn scrape_local(dir: &Path, config: &Config) -> Result<Inventory> {
    let mut filters = FilterSet::new(config.include.as_deref(), config.exclude.as_deref())
        .skip_vcs_dirs(true);
    if config.respect_gitignore {
        // Anchor rules at the absolute root so relative walk paths are never stripped as a prefix.
        let root = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        filters = filters.with_ignore(IgnoreMatcher::new(root));
    }

    LocalWalker::new(dir)
        .follow_symlinks(config.follow_symlinks)
        .file_urls(config.local_file_urls)
        .strict(config.strict)
        .walk(&filters)
        .with_context(|| format!("Failed scraping local directory {}", dir.display()))
}

fn scrape_remote(url: &str, config: &Config) -> Result<Inventory> {
    let client = GithubClient::new(&config.api_base)?
        .token(config.token.clone())
        .page_size(config.page_size);
    let filters = FilterSet::new(config.include.as_deref(), config.exclude.as_deref());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed starting async runtime")?;

    runtime
        .block_on(fetch_repository(&client, url, &filters, config.page_size))
        .with_context(|| format!("Failed scraping GitHub repository {url}"))
}
