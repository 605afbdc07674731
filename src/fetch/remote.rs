//! Remote repository traversal.
//!
//! Directories are walked depth-first with an explicit stack of open
//! listings. A subdirectory's records are inlined at the point where it is
//! listed, and the next page of a directory is only requested once every
//! entry of the current page (subtrees included) has been handled. Requests
//! are issued one at a time.

use super::{ContentsApi, FetchError, RepoRef};
use crate::domain::{clamp_page_size, FileRecord, PAGE_SIZE};
use crate::filter::{Candidate, FilterSet, Verdict};
use crate::inventory::Inventory;
use crate::normalize::normalize;
use serde::Deserialize;
use serde_json::Value;

/// One entry of a contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks and submodules; never traversed.
    #[serde(other)]
    Other,
}

struct Listing {
    path: String,
    page: usize,
    entries: std::vec::IntoIter<ContentEntry>,
    has_more: bool,
}

/// Walks a hosted repository through a [`ContentsApi`].
pub struct RemoteWalker<'a, A: ?Sized> {
    api: &'a A,
    repo: RepoRef,
    page_size: usize,
}

impl<'a, A> RemoteWalker<'a, A>
where
    A: ContentsApi + ?Sized,
{
    pub fn new(api: &'a A, repo: RepoRef) -> Self {
        Self { api, repo, page_size: PAGE_SIZE }
    }

    /// Entries per full page. A page of exactly this size is assumed to be
    /// followed by another one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    /// Walk the repository from its root.
    ///
    /// Any listing failure aborts the walk. A file whose content cannot be
    /// downloaded is logged and left out.
    pub async fn walk(&self, filters: &FilterSet) -> Result<Inventory, FetchError> {
        let mut inventory = Inventory::new();
        let mut stack = vec![self.open(&mut inventory, String::new(), 1).await?];

        loop {
            let Some(listing) = stack.last_mut() else { break };
            let Some(entry) = listing.entries.next() else {
                if let Some(done) = stack.pop() {
                    if done.has_more {
                        stack.push(self.open(&mut inventory, done.path, done.page + 1).await?);
                    }
                }
                continue;
            };

            match entry.kind {
                EntryKind::File => self.visit_file(&mut inventory, filters, entry).await,
                EntryKind::Dir => stack.push(self.open(&mut inventory, entry.path, 1).await?),
                EntryKind::Other => tracing::debug!("Skipping {} (not a file or directory)", entry.path),
            }
        }

        Ok(inventory)
    }

    async fn open(
        &self,
        inventory: &mut Inventory,
        path: String,
        page: usize,
    ) -> Result<Listing, FetchError> {
        tracing::info!("Listing {}:/{} (page {})", self.repo, path, page);
        let body = self.api.list_directory(&self.repo, &path, page).await?;

        let stats = inventory.stats_mut();
        stats.pages_requested += 1;
        if page == 1 {
            stats.directories_listed += 1;
        }

        let entries = parse_listing(&path, body)?;
        let has_more = entries.len() == self.page_size;
        Ok(Listing { path, page, entries: entries.into_iter(), has_more })
    }

    async fn visit_file(&self, inventory: &mut Inventory, filters: &FilterSet, entry: ContentEntry) {
        if let Verdict::Skip(reason) = filters.check(&Candidate::file(&entry.name, &entry.path)) {
            inventory.skip(&entry.path, reason);
            return;
        }

        let Some(download_url) = entry.download_url.as_deref() else {
            tracing::warn!("Could not fetch file content for {}: no download URL", entry.path);
            inventory.stats_mut().fetch_failures += 1;
            return;
        };

        match self.api.download(download_url).await {
            Ok(payload) => {
                inventory.push(FileRecord::new(entry.path, entry.html_url, normalize(payload)))
            }
            Err(e) => {
                tracing::warn!("Could not fetch file content for {}: {}", entry.path, e);
                inventory.stats_mut().fetch_failures += 1;
            }
        }
    }
}

/// Check that a listing body is an array of entries.
pub fn parse_listing(path: &str, body: Value) -> Result<Vec<ContentEntry>, FetchError> {
    let Value::Array(items) = body else {
        return Err(FetchError::UnexpectedListing {
            path: path.to_string(),
            detail: "expected an array of entries".to_string(),
        });
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| FetchError::UnexpectedListing {
                path: path.to_string(),
                detail: format!("malformed entry: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Payload;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory contents API that records every request it serves.
    #[derive(Default)]
    struct FakeApi {
        listings: HashMap<(String, usize), Value>,
        files: HashMap<String, Result<String, u16>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn listing(mut self, path: &str, page: usize, entries: Vec<Value>) -> Self {
            self.listings.insert((path.to_string(), page), Value::Array(entries));
            self
        }

        fn raw_listing(mut self, path: &str, page: usize, body: Value) -> Self {
            self.listings.insert((path.to_string(), page), body);
            self
        }

        fn content(mut self, path: &str, body: &str) -> Self {
            self.files.insert(download_url(path), Ok(body.to_string()));
            self
        }

        fn failing(mut self, path: &str, status: u16) -> Self {
            self.files.insert(download_url(path), Err(status));
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn listing_requests(&self) -> Vec<String> {
            self.requests().into_iter().filter(|r| r.starts_with("list ")).collect()
        }
    }

    #[async_trait]
    impl ContentsApi for FakeApi {
        async fn list_directory(
            &self,
            _repo: &RepoRef,
            path: &str,
            page: usize,
        ) -> Result<Value, FetchError> {
            self.requests.lock().unwrap().push(format!("list {path}?page={page}"));
            match self.listings.get(&(path.to_string(), page)) {
                Some(body) => Ok(body.clone()),
                None if page > 1 => Ok(json!([])),
                None => Err(FetchError::Status { url: format!("contents/{path}"), status: 404 }),
            }
        }

        async fn download(&self, url: &str) -> Result<Payload, FetchError> {
            self.requests.lock().unwrap().push(format!("get {url}"));
            match self.files.get(url) {
                Some(Ok(body)) => Ok(Payload::sniff(body.clone())),
                Some(Err(status)) => {
                    Err(FetchError::Status { url: url.to_string(), status: *status })
                }
                None => Err(FetchError::Status { url: url.to_string(), status: 404 }),
            }
        }
    }

    fn download_url(path: &str) -> String {
        format!("https://raw.example.com/octo/hello/main/{path}")
    }

    fn file(path: &str) -> Value {
        let name = path.rsplit('/').next().unwrap_or(path);
        json!({
            "type": "file",
            "name": name,
            "path": path,
            "download_url": download_url(path),
            "html_url": format!("https://github.com/octo/hello/blob/main/{path}"),
        })
    }

    fn dir(path: &str) -> Value {
        let name = path.rsplit('/').next().unwrap_or(path);
        json!({
            "type": "dir",
            "name": name,
            "path": path,
            "download_url": null,
            "html_url": format!("https://github.com/octo/hello/tree/main/{path}"),
        })
    }

    fn numbered_files(count: usize) -> (Vec<Value>, Vec<String>) {
        let paths: Vec<String> = (0..count).map(|i| format!("f{i:02}.txt")).collect();
        (paths.iter().map(|p| file(p)).collect(), paths)
    }

    async fn walk(api: &FakeApi, filters: &FilterSet) -> Result<Inventory, FetchError> {
        RemoteWalker::new(api, RepoRef::new("octo", "hello")).walk(filters).await
    }

    #[tokio::test]
    async fn test_full_page_triggers_exactly_one_follow_up() {
        let (entries, paths) = numbered_files(PAGE_SIZE);
        let mut api = FakeApi::default().listing("", 1, entries);
        for p in &paths {
            api = api.content(p, "x");
        }

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();

        assert_eq!(api.listing_requests(), vec!["list ?page=1", "list ?page=2"]);
        assert_eq!(inventory.len(), PAGE_SIZE);
        assert_eq!(inventory.stats().pages_requested, 2);
        assert_eq!(inventory.stats().directories_listed, 1);
    }

    #[tokio::test]
    async fn test_short_page_stops_pagination() {
        let (entries, paths) = numbered_files(PAGE_SIZE - 1);
        let mut api = FakeApi::default().listing("", 1, entries);
        for p in &paths {
            api = api.content(p, "x");
        }

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();

        assert_eq!(api.listing_requests(), vec!["list ?page=1"]);
        assert_eq!(inventory.len(), PAGE_SIZE - 1);
    }

    #[tokio::test]
    async fn test_custom_page_size_moves_the_ceiling() {
        let api = FakeApi::default()
            .listing("", 1, vec![file("a.txt"), file("b.txt")])
            .listing("", 2, vec![file("c.txt")])
            .content("a.txt", "a")
            .content("b.txt", "b")
            .content("c.txt", "c");

        let inventory = RemoteWalker::new(&api, RepoRef::new("octo", "hello"))
            .page_size(2)
            .walk(&FilterSet::default())
            .await
            .unwrap();

        assert_eq!(inventory.paths(), vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(api.listing_requests(), vec!["list ?page=1", "list ?page=2"]);
    }

    #[tokio::test]
    async fn test_oversized_page_size_follows_provider_cap() {
        let names: Vec<String> = (0..150).map(|i| format!("f{i:03}.txt")).collect();
        let mut api = FakeApi::default()
            .listing("", 1, names[..100].iter().map(|n| file(n)).collect())
            .listing("", 2, names[100..].iter().map(|n| file(n)).collect());
        for name in &names {
            api = api.content(name, "x");
        }

        let inventory = RemoteWalker::new(&api, RepoRef::new("octo", "hello"))
            .page_size(500)
            .walk(&FilterSet::default())
            .await
            .unwrap();

        assert_eq!(inventory.len(), 150);
        assert_eq!(api.listing_requests(), vec!["list ?page=1", "list ?page=2"]);
    }

    #[tokio::test]
    async fn test_subdirectories_are_inlined_in_discovery_order() {
        let api = FakeApi::default()
            .listing("", 1, vec![file("a.md"), dir("src"), file("z.md")])
            .listing("src", 1, vec![file("src/lib.rs"), dir("src/bin"), file("src/util.rs")])
            .listing("src/bin", 1, vec![file("src/bin/main.rs")])
            .content("a.md", "a")
            .content("z.md", "z")
            .content("src/lib.rs", "lib")
            .content("src/util.rs", "util")
            .content("src/bin/main.rs", "main");

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();

        assert_eq!(
            inventory.paths(),
            vec!["a.md", "src/lib.rs", "src/bin/main.rs", "src/util.rs", "z.md"]
        );
        assert_eq!(inventory.stats().directories_listed, 3);
        assert_eq!(
            inventory.records()[0].url.as_deref(),
            Some("https://github.com/octo/hello/blob/main/a.md")
        );
    }

    #[tokio::test]
    async fn test_next_page_follows_subtrees_of_current_page() {
        let mut page_one = vec![dir("docs")];
        let (files, paths) = numbered_files(PAGE_SIZE - 1);
        page_one.extend(files);
        let mut api = FakeApi::default()
            .listing("", 1, page_one)
            .listing("", 2, vec![file("zz.txt")])
            .listing("docs", 1, vec![file("docs/guide.md")])
            .content("docs/guide.md", "guide")
            .content("zz.txt", "last");
        for p in &paths {
            api = api.content(p, "x");
        }

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();
        let order = inventory.paths();

        assert_eq!(order.first(), Some(&"docs/guide.md"));
        assert_eq!(order.last(), Some(&"zz.txt"));
        assert_eq!(
            api.listing_requests(),
            vec!["list ?page=1", "list docs?page=1", "list ?page=2"]
        );
    }

    #[tokio::test]
    async fn test_failed_download_keeps_siblings() {
        let api = FakeApi::default()
            .listing("", 1, vec![file("a.txt"), file("huge.txt"), file("c.txt")])
            .content("a.txt", "a")
            .failing("huge.txt", 403)
            .content("c.txt", "c");

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();

        assert_eq!(inventory.paths(), vec!["a.txt", "c.txt"]);
        assert_eq!(inventory.stats().fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_file_without_download_url_is_a_fetch_failure() {
        let mut entry = file("weird.txt");
        entry["download_url"] = Value::Null;
        let api = FakeApi::default().listing("", 1, vec![entry, file("ok.txt")]).content("ok.txt", "ok");

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();

        assert_eq!(inventory.paths(), vec!["ok.txt"]);
        assert_eq!(inventory.stats().fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_filtered_files_are_never_downloaded() {
        let api = FakeApi::default()
            .listing(
                "",
                1,
                vec![
                    file("logo.png"),
                    file("yarn.lock"),
                    file("a.ts"),
                    file("a.test.ts"),
                    file("a.js"),
                ],
            )
            .content("a.ts", "export {}");

        let filters = FilterSet::new(Some("*.ts"), Some("*.test.ts"));
        let inventory = walk(&api, &filters).await.unwrap();

        assert_eq!(inventory.paths(), vec!["a.ts"]);
        let downloads: Vec<String> =
            api.requests().into_iter().filter(|r| r.starts_with("get ")).collect();
        assert_eq!(downloads, vec![format!("get {}", download_url("a.ts"))]);

        let stats = inventory.stats();
        assert_eq!(stats.files_skipped_binary, 1);
        assert_eq!(stats.files_skipped_lockfile, 1);
        assert_eq!(stats.files_skipped_excluded, 1);
        assert_eq!(stats.files_skipped_not_included, 1);
    }

    #[tokio::test]
    async fn test_globs_never_prune_remote_directories() {
        let api = FakeApi::default()
            .listing("", 1, vec![dir("lib")])
            .listing("lib", 1, vec![file("lib/index.ts")])
            .content("lib/index.ts", "x");

        let filters = FilterSet::new(Some("**/*.ts"), Some("lib"));
        let inventory = walk(&api, &filters).await.unwrap();
        assert_eq!(inventory.paths(), vec!["lib/index.ts"]);
    }

    #[tokio::test]
    async fn test_json_content_is_pretty_printed() {
        let api = FakeApi::default()
            .listing("", 1, vec![file("package.json")])
            .content("package.json", r#"{"name":"hello","private":true}"#);

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();
        let content = &inventory.records()[0].content;

        assert_eq!(content, "{\n  \"name\": \"hello\",\n  \"private\": true\n}");
        let reparsed: Value = serde_json::from_str(content).unwrap();
        assert_eq!(reparsed, json!({"name": "hello", "private": true}));
    }

    #[tokio::test]
    async fn test_symlinks_and_submodules_are_ignored() {
        let api = FakeApi::default()
            .listing(
                "",
                1,
                vec![
                    json!({"type": "symlink", "name": "link", "path": "link", "download_url": null}),
                    json!({"type": "submodule", "name": "vendor", "path": "vendor"}),
                    file("a.txt"),
                ],
            )
            .content("a.txt", "a");

        let inventory = walk(&api, &FilterSet::default()).await.unwrap();
        assert_eq!(inventory.paths(), vec!["a.txt"]);
        assert_eq!(api.listing_requests(), vec!["list ?page=1"]);
    }

    #[tokio::test]
    async fn test_non_array_listing_is_fatal() {
        let api = FakeApi::default().raw_listing("", 1, json!({"message": "Not Found"}));

        let err = walk(&api, &FilterSet::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedListing { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_malformed_entry_is_fatal() {
        let api = FakeApi::default().listing("", 1, vec![json!({"type": "file", "name": "x"})]);

        let err = walk(&api, &FilterSet::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedListing { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_nested_listing_failure_aborts_everything() {
        let api = FakeApi::default()
            .listing("", 1, vec![file("a.txt"), dir("missing"), file("b.txt")])
            .content("a.txt", "a")
            .content("b.txt", "b");

        let err = walk(&api, &FilterSet::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }), "got {err}");
        // Nothing after the failing listing was requested.
        assert!(!api.requests().iter().any(|r| r.contains("b.txt")));
    }

    #[tokio::test]
    async fn test_fetch_repository_parses_url_first() {
        let api = FakeApi::default();
        let err = crate::fetch::fetch_repository(
            &api,
            "https://example.com/octo/hello",
            &FilterSet::default(),
            PAGE_SIZE,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::InvalidRepoUrl(_)));
        assert!(api.requests().is_empty());
    }

    #[test]
    fn test_parse_listing_accepts_empty_array() {
        assert!(parse_listing("", json!([])).unwrap().is_empty());
    }
}
