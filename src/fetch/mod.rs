//! Remote repository fetching through the GitHub contents API

use crate::filter::FilterSet;
use crate::inventory::Inventory;
use crate::normalize::Payload;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod client;
pub mod github;
pub mod remote;

pub use client::GithubClient;
pub use github::{parse_repo_url, RepoRef};
pub use remote::RemoteWalker;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid GitHub URL: {0}")]
    InvalidRepoUrl(String),
    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),
    #[error("Invalid response from GitHub API for '{path}': {detail}")]
    UnexpectedListing { path: String, detail: String },
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// The two requests the remote walker makes against a hosting provider.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// Fetch one page of the directory listing at `path` (`""` is the repository root).
    ///
    /// Returns the decoded response body; its shape is checked by the caller.
    async fn list_directory(&self, repo: &RepoRef, path: &str, page: usize)
        -> Result<Value, FetchError>;

    /// Download a file's content from its download reference.
    async fn download(&self, url: &str) -> Result<Payload, FetchError>;
}

/// Parse `url` and walk the whole repository with `api`.
pub async fn fetch_repository<A>(
    api: &A,
    url: &str,
    filters: &FilterSet,
    page_size: usize,
) -> Result<Inventory, FetchError>
where
    A: ContentsApi + ?Sized,
{
    let repo = parse_repo_url(url)?;
    RemoteWalker::new(api, repo).page_size(page_size).walk(filters).await
}
