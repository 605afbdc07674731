//! CLI flags layered over file configuration

use crate::domain::Config;

/// Values given on the command line. `None`/`false` leave the config untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub api_base: Option<String>,
    pub page_size: Option<usize>,
    pub token: Option<String>,
    pub local_file_urls: bool,
    pub strict: bool,
    pub no_follow_symlinks: bool,
    pub no_gitignore: bool,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if cli.include.is_some() {
        config.include = cli.include;
    }
    if cli.exclude.is_some() {
        config.exclude = cli.exclude;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }
    config.local_file_urls |= cli.local_file_urls;
    config.strict |= cli.strict;
    if cli.no_follow_symlinks {
        config.follow_symlinks = false;
    }
    if cli.no_gitignore {
        config.respect_gitignore = false;
    }
    config
}
