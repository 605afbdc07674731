//! Keep/skip policies applied to every candidate entry.
//!
//! Checks run in a fixed order and stop at the first rejection:
//! binary extension, lock file name, ignore rules, exclude glob, include glob.

pub mod classify;
pub mod gitignore;
pub mod glob;

pub use classify::{is_binary_name, is_lock_file};
pub use gitignore::IgnoreMatcher;
pub use glob::PathPattern;

use crate::domain::SkipReason;

/// An entry discovered during traversal, before any content is read.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Bare entry name, used by the extension and lock file checks.
    pub name: &'a str,
    /// Forward-slash path relative to the traversal root.
    pub path: &'a str,
    pub is_dir: bool,
}

impl<'a> Candidate<'a> {
    pub fn file(name: &'a str, path: &'a str) -> Self {
        Self { name, path, is_dir: false }
    }

    pub fn dir(name: &'a str, path: &'a str) -> Self {
        Self { name, path, is_dir: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Skip(SkipReason),
}

impl Verdict {
    pub fn is_keep(self) -> bool {
        matches!(self, Verdict::Keep)
    }
}

/// The composed filter chain for one traversal.
#[derive(Debug, Default)]
pub struct FilterSet {
    include: Option<PathPattern>,
    exclude: Option<PathPattern>,
    ignore: Option<IgnoreMatcher>,
    skip_vcs_dirs: bool,
}

impl FilterSet {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include: PathPattern::from_option(include),
            exclude: PathPattern::from_option(exclude),
            ignore: None,
            skip_vcs_dirs: false,
        }
    }

    /// Consult `matcher` for every candidate.
    pub fn with_ignore(mut self, matcher: IgnoreMatcher) -> Self {
        self.ignore = Some(matcher);
        self
    }

    /// Skip `.git` and `node_modules` entries regardless of ignore rules.
    pub fn skip_vcs_dirs(mut self, yes: bool) -> Self {
        self.skip_vcs_dirs = yes;
        self
    }

    /// Decide whether `candidate` stays in the traversal.
    ///
    /// Directories only go through the name and ignore checks; the globs
    /// describe files and never prune a subtree.
    pub fn check(&self, candidate: &Candidate<'_>) -> Verdict {
        if is_binary_name(candidate.name) {
            return Verdict::Skip(SkipReason::BinaryExtension);
        }
        if is_lock_file(candidate.name) {
            return Verdict::Skip(SkipReason::Lockfile);
        }
        if self.skip_vcs_dirs && gitignore::is_always_skipped(candidate.name) {
            return Verdict::Skip(SkipReason::VcsIgnored);
        }
        if let Some(matcher) = &self.ignore {
            if matcher.is_ignored(candidate.path, candidate.is_dir) {
                return Verdict::Skip(SkipReason::VcsIgnored);
            }
        }
        if candidate.is_dir {
            return Verdict::Keep;
        }
        if self.exclude.as_ref().is_some_and(|p| p.is_match(candidate.path)) {
            return Verdict::Skip(SkipReason::Excluded);
        }
        if self.include.as_ref().is_some_and(|p| !p.is_match(candidate.path)) {
            return Verdict::Skip(SkipReason::NotIncluded);
        }
        Verdict::Keep
    }
}
