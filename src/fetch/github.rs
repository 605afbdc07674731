//! GitHub repository URL parsing

use super::FetchError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static GITHUB_REPO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com[/:](?P<owner>[^/?#]+)/(?P<repo>[^/?#]+)").unwrap()
});

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract `owner/repo` from a GitHub URL.
///
/// Accepts browser URLs (including deep links such as `/tree/main/src`),
/// clone URLs with a `.git` suffix and `git@github.com:owner/repo` remotes.
pub fn parse_repo_url(url: &str) -> Result<RepoRef, FetchError> {
    let caps =
        GITHUB_REPO_URL.captures(url).ok_or_else(|| FetchError::InvalidRepoUrl(url.to_string()))?;

    let owner = &caps["owner"];
    let name = caps["repo"].trim_end_matches(".git");
    if owner.is_empty() || name.is_empty() {
        return Err(FetchError::InvalidRepoUrl(url.to_string()));
    }

    Ok(RepoRef::new(owner, name))
}
