//! Command-line interface for repo-gpt-scraper

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scrape;

pub use scrape::ScrapeArgs;

/// Flatten a GitHub repository or local directory into a JSON inventory of text files
#[derive(Parser)]
#[command(name = "repo-gpt-scraper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: ScrapeArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, replaces the level chosen by --verbose.
    let default_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    scrape::run(cli.args)
}
