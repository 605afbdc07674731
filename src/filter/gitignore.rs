//! Root-level `.gitignore` matching for local traversal.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use once_cell::sync::OnceCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const GITIGNORE_FILE: &str = ".gitignore";

/// Entry names skipped during local traversal whatever the ignore rules say.
pub const ALWAYS_SKIPPED: &[&str] = &[".git", "node_modules"];

pub fn is_always_skipped(name: &str) -> bool {
    ALWAYS_SKIPPED.contains(&name)
}

/// Matcher for the ignore rules found in `<root>/.gitignore`.
///
/// The rules file is read and compiled on the first query and reused for
/// every query after that. Unreadable files and malformed lines degrade to
/// "no rule" instead of failing the walk.
#[derive(Debug)]
pub struct IgnoreMatcher {
    root: PathBuf,
    rules: OnceCell<Gitignore>,
}

impl IgnoreMatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), rules: OnceCell::new() }
    }

    /// Build a matcher from rule text instead of reading the root's rules file.
    pub fn from_rules(root: impl Into<PathBuf>, rules: &str) -> Self {
        let matcher = Self::new(root);
        let compiled = compile(&matcher.root, rules, None);
        let _ = matcher.rules.set(compiled);
        matcher
    }

    pub fn is_loaded(&self) -> bool {
        self.rules.get().is_some()
    }

    /// Check a root-relative path. A path is ignored when it, or any
    /// directory above it, matches a rule.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        if rel_path.is_empty() {
            return false;
        }
        self.rules().matched_path_or_any_parents(rel_path, is_dir).is_ignore()
    }

    fn rules(&self) -> &Gitignore {
        self.rules.get_or_init(|| load(&self.root))
    }
}

fn load(root: &Path) -> Gitignore {
    let path = root.join(GITIGNORE_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!("Loaded ignore rules from {}", path.display());
            compile(root, &content, Some(path))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Gitignore::empty(),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            Gitignore::empty()
        }
    }
}

fn compile(root: &Path, content: &str, source: Option<PathBuf>) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for line in content.lines() {
        if let Err(e) = builder.add_line(source.clone(), line) {
            tracing::warn!("Skipping malformed ignore rule '{}': {}", line, e);
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Could not compile ignore rules: {}", e);
        Gitignore::empty()
    })
}
