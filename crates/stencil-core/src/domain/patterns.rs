//! Name patterns for include/exclude filtering.
//!
//! A pattern matches a single file or directory name, never a path. Without
//! `*` it must equal the name exactly; with `*` it is an anchored match where
//! `*` stands for any run of characters.

use globset::{GlobBuilder, GlobMatcher};

use crate::domain::error::DomainError;

/// Directories skipped unless the caller replaces the exclude set.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", "node_modules"];

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Glob(GlobMatcher),
}

#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    matcher: Matcher,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        if pattern.is_empty() {
            return Err(DomainError::InvalidPattern {
                pattern: pattern.into(),
                reason: "pattern cannot be empty".into(),
            });
        }
        if pattern.contains('/') {
            return Err(DomainError::InvalidPattern {
                pattern: pattern.into(),
                reason: "patterns match single names, not paths".into(),
            });
        }

        let matcher = if pattern.contains('*') {
            let glob = GlobBuilder::new(&escape_except_star(pattern))
                .literal_separator(false)
                .backslash_escape(true)
                .build()
                .map_err(|e| DomainError::InvalidPattern {
                    pattern: pattern.into(),
                    reason: e.to_string(),
                })?;
            Matcher::Glob(glob.compile_matcher())
        } else {
            Matcher::Exact(pattern.to_string())
        };

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(exact) => exact == name,
            Matcher::Glob(glob) => glob.is_match(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Only `*` is special; every other glob metacharacter is taken literally.
fn escape_except_star(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '?' | '[' | ']' | '{' | '}' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// An ordered set of patterns; matches when any member does.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<NamePattern>,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, S>(patterns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| NamePattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// `.git` and `node_modules`.
    pub fn default_excludes() -> Self {
        Self {
            patterns: DEFAULT_EXCLUDES
                .iter()
                .map(|p| NamePattern {
                    source: (*p).to_string(),
                    matcher: Matcher::Exact((*p).to_string()),
                })
                .collect(),
        }
    }

    pub fn extend(mut self, other: PatternSet) -> Self {
        self.patterns.extend(other.patterns);
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
