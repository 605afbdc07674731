//! Include/exclude glob patterns.

use globset::{GlobBuilder, GlobMatcher};

/// A single user-supplied glob matched against root-relative paths.
///
/// `*` stops at `/` while `**` spans any number of segments. Wildcards never
/// match a segment starting with `.`; only a pattern segment that itself
/// starts with `.` can. A pattern that fails to compile matches nothing.
#[derive(Debug, Clone)]
pub struct PathPattern {
    matcher: Option<Matcher>,
}

#[derive(Debug, Clone)]
enum Matcher {
    Segments(Vec<Segment>),
    /// Brace alternatives spanning `/` cannot be split per segment.
    WholePath(GlobMatcher),
}

#[derive(Debug, Clone)]
enum Segment {
    Globstar,
    Name { glob: GlobMatcher, dot: bool },
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let matcher = match compile(pattern) {
            Ok(glob) => Some(split_segments(pattern).unwrap_or(Matcher::WholePath(glob))),
            Err(e) => {
                tracing::warn!("Invalid glob pattern '{}': {}", pattern, e);
                None
            }
        };
        Self { matcher }
    }

    /// Build a pattern from optional user input; blank input means "not configured".
    pub fn from_option(pattern: Option<&str>) -> Option<Self> {
        pattern.map(str::trim).filter(|p| !p.is_empty()).map(Self::new)
    }

    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            Some(Matcher::Segments(segments)) => {
                let parts: Vec<&str> = path.split('/').collect();
                match_segments(segments, &parts)
            }
            Some(Matcher::WholePath(glob)) => glob.is_match(path),
            None => false,
        }
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?.compile_matcher())
}

/// Split on `/` outside of `[...]` and `{...}`, compiling each segment.
fn split_segments(pattern: &str) -> Option<Matcher> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let (mut braces, mut in_class, mut escaped) = (0usize, false, false);

    for c in pattern.chars() {
        if escaped {
            escaped = false;
        } else {
            match c {
                '\\' => escaped = true,
                '[' if !in_class => in_class = true,
                ']' if in_class => in_class = false,
                '{' if !in_class => braces += 1,
                '}' if !in_class => braces = braces.saturating_sub(1),
                '/' if !in_class && braces == 0 => {
                    pieces.push(std::mem::take(&mut current));
                    continue;
                }
                _ => {}
            }
        }
        current.push(c);
    }
    pieces.push(current);

    let mut segments = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece == "**" {
            segments.push(Segment::Globstar);
            continue;
        }
        if piece.contains('/') {
            return None;
        }
        let glob = compile(&piece).ok()?;
        segments.push(Segment::Name { dot: piece.starts_with('.'), glob });
    }
    Some(Matcher::Segments(segments))
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> bool {
    match segments.split_first() {
        None => parts.is_empty(),
        Some((Segment::Globstar, rest)) => {
            for skip in 0..=parts.len() {
                if match_segments(rest, &parts[skip..]) {
                    return true;
                }
                // `**` does not descend through dot directories.
                if parts.get(skip).is_some_and(|p| p.starts_with('.')) {
                    return false;
                }
            }
            false
        }
        Some((Segment::Name { glob, dot }, rest)) => match parts.split_first() {
            Some((head, tail)) => {
                (*dot || !head.starts_with('.')) && glob.is_match(head) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}
