//! HTTP client for the GitHub contents API

use super::{ContentsApi, FetchError, RepoRef};
use crate::domain::{clamp_page_size, PAGE_SIZE};
use crate::normalize::Payload;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::Value;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// `reqwest`-backed [`ContentsApi`].
///
/// Requests carry no timeout and are never retried.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: Url,
    token: Option<String>,
    per_page: Option<usize>,
}

impl GithubClient {
    pub fn new(api_base: &str) -> Result<Self, FetchError> {
        let base = Url::parse(api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| FetchError::InvalidApiBase(api_base.to_string()))?;
        let http =
            reqwest::Client::builder().user_agent(USER_AGENT).build().map_err(FetchError::Client)?;
        Ok(Self { http, api_base: base, token: None, per_page: None })
    }

    /// Authenticate API requests with a bearer token
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Request pages of `page_size` entries; the provider default is sent implicitly
    pub fn page_size(mut self, page_size: usize) -> Self {
        let page_size = clamp_page_size(page_size);
        self.per_page = (page_size != PAGE_SIZE).then_some(page_size);
        self
    }

    /// `{base}/repos/{owner}/{repo}/contents/{path}?page={page}`
    pub fn listing_url(&self, repo: &RepoRef, path: &str, page: usize) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(per_page) = self.per_page {
                query.append_pair("per_page", &per_page.to_string());
            }
        }
        url
    }

    async fn get_text(&self, url: &str, api: bool) -> Result<String, FetchError> {
        let mut request = self.http.get(url);
        if api {
            request = request.header(ACCEPT, GITHUB_JSON);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response.text().await.map_err(|source| FetchError::Transport { url: url.to_string(), source })
    }
}

#[async_trait]
impl ContentsApi for GithubClient {
    async fn list_directory(
        &self,
        repo: &RepoRef,
        path: &str,
        page: usize,
    ) -> Result<Value, FetchError> {
        let url = self.listing_url(repo, path, page);
        let body = self.get_text(url.as_str(), true).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::UnexpectedListing {
            path: path.to_string(),
            detail: format!("response is not JSON: {e}"),
        })
    }

    async fn download(&self, url: &str) -> Result<Payload, FetchError> {
        let body = self.get_text(url, false).await?;
        Ok(Payload::sniff(body))
    }
}
