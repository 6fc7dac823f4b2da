//! Variant markers in file names.
//!
//! A file named `App.with-api.tsx.template` is the `api` variant of
//! `App.tsx`. When the `api` variant is active for a copy it replaces the
//! unmarked sibling; otherwise it is skipped entirely.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Marker segment prefix: `<base>.with-<tag>.<rest>`.
pub const VARIANT_PREFIX: &str = "with-";

/// Suffix of files whose content is rendered. Stripped on output.
pub const TEMPLATE_SUFFIX: &str = ".template";

/// The name of one variant, e.g. `api`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantTag(String);

impl VariantTag {
    pub fn new(tag: impl Into<String>) -> Result<Self, DomainError> {
        let tag = tag.into();
        let reason = if tag.is_empty() {
            Some("tag cannot be empty")
        } else if tag.contains('.') || tag.contains('/') || tag.contains('\\') {
            Some("tag cannot contain '.' or path separators")
        } else if tag.chars().any(char::is_whitespace) {
            Some("tag cannot contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidVariantTag {
                tag,
                reason: reason.into(),
            }),
            None => Ok(Self(tag)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw file name taken apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Output name: marker segment removed, template suffix stripped.
    pub final_name: String,
    /// Tag of the variant marker, if any.
    pub marker: Option<String>,
    /// Whether the raw name carried the template suffix.
    pub is_template: bool,
}

/// Split a raw file name into its final name, variant marker and template flag.
///
/// Only interior segments can be markers, so `with-x.txt` and `a.with-x` are
/// plain names.
///
/// # Errors
///
/// More than one marker, or a marker with an empty tag.
pub fn parse_name(raw: &str) -> Result<ParsedName, DomainError> {
    let segments: Vec<&str> = raw.split('.').collect();
    let interior = segments.len().saturating_sub(1);

    let markers: Vec<usize> = (1..interior)
        .filter(|&i| segments[i].starts_with(VARIANT_PREFIX))
        .collect();

    if markers.len() > 1 {
        return Err(DomainError::MultipleVariantMarkers { name: raw.into() });
    }

    let marker = match markers.first() {
        Some(&i) => {
            let tag = &segments[i][VARIANT_PREFIX.len()..];
            if tag.is_empty() {
                return Err(DomainError::EmptyVariantTag { name: raw.into() });
            }
            Some((i, tag.to_string()))
        }
        None => None,
    };

    let unmarked = match &marker {
        Some((i, _)) => segments
            .iter()
            .enumerate()
            .filter(|(j, _)| j != i)
            .map(|(_, s)| *s)
            .collect::<Vec<_>>()
            .join("."),
        None => raw.to_string(),
    };

    let (final_name, is_template) = match unmarked.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stem) if !stem.is_empty() => (stem.to_string(), true),
        _ => (unmarked, false),
    };

    Ok(ParsedName {
        final_name,
        marker: marker.map(|(_, tag)| tag),
        is_template,
    })
}

/// Why a file was not emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Marked for a variant other than the active one.
    InactiveVariant { tag: String },
    /// Marked, but this copy has no active variant.
    NoActiveVariant { tag: String },
    /// Unmarked base file replaced by an active-variant sibling.
    Superseded { final_name: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InactiveVariant { tag } => write!(f, "variant '{tag}' is not active"),
            Self::NoActiveVariant { tag } => {
                write!(f, "variant '{tag}' skipped: no variant selected")
            }
            Self::Superseded { final_name } => {
                write!(f, "superseded by the active variant of '{final_name}'")
            }
        }
    }
}

/// Outcome of resolving one file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResolution {
    Emit(String),
    Skip(SkipReason),
}

impl NameResolution {
    pub fn is_emit(&self) -> bool {
        matches!(self, Self::Emit(_))
    }
}

/// Names that the active variant provides, keyed by directory.
///
/// Filled during the first pass over a template root; consulted in the
/// second pass to suppress base files.
#[derive(Debug, Clone, Default)]
pub struct VariantIndex {
    active: Option<VariantTag>,
    provided: HashSet<(PathBuf, String)>,
}

impl VariantIndex {
    pub fn new(active: Option<VariantTag>) -> Self {
        Self {
            active,
            provided: HashSet::new(),
        }
    }

    pub fn active(&self) -> Option<&VariantTag> {
        self.active.as_ref()
    }

    /// Record a file seen during enumeration.
    pub fn record(&mut self, dir: &Path, name: &ParsedName) {
        let matches_active = match (&self.active, &name.marker) {
            (Some(active), Some(tag)) => active.as_str() == tag,
            _ => false,
        };
        if matches_active {
            self.provided
                .insert((dir.to_path_buf(), name.final_name.clone()));
        }
    }

    fn provides(&self, dir: &Path, final_name: &str) -> bool {
        self.provided
            .contains(&(dir.to_path_buf(), final_name.to_string()))
    }

    /// Decide whether a file in `dir` is emitted and under which name.
    pub fn resolve(&self, dir: &Path, name: &ParsedName) -> NameResolution {
        match (&name.marker, &self.active) {
            (Some(tag), Some(active)) if active.as_str() == tag => {
                NameResolution::Emit(name.final_name.clone())
            }
            (Some(tag), Some(_)) => {
                NameResolution::Skip(SkipReason::InactiveVariant { tag: tag.clone() })
            }
            (Some(tag), None) => {
                NameResolution::Skip(SkipReason::NoActiveVariant { tag: tag.clone() })
            }
            (None, _) if self.provides(dir, &name.final_name) => {
                NameResolution::Skip(SkipReason::Superseded {
                    final_name: name.final_name.clone(),
                })
            }
            (None, _) => NameResolution::Emit(name.final_name.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.provided.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provided.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> Option<VariantTag> {
        Some(VariantTag::new("api").unwrap())
    }

    #[test]
    fn parses_marked_template() {
        let parsed = parse_name("App.with-api.tsx.template").unwrap();
        assert_eq!(parsed.final_name, "App.tsx");
        assert_eq!(parsed.marker.as_deref(), Some("api"));
        assert!(parsed.is_template);
    }

    #[test]
    fn parses_plain_names() {
        let parsed = parse_name("logo.png").unwrap();
        assert_eq!(parsed.final_name, "logo.png");
        assert_eq!(parsed.marker, None);
        assert!(!parsed.is_template);

        let dotfile = parse_name(".gitignore.template").unwrap();
        assert_eq!(dotfile.final_name, ".gitignore");
        assert!(dotfile.is_template);
    }

    #[test]
    fn edge_segments_are_not_markers() {
        assert_eq!(parse_name("with-x.txt").unwrap().marker, None);
        assert_eq!(parse_name("a.with-x").unwrap().marker, None);
    }

    #[test]
    fn bare_template_suffix_is_kept() {
        let parsed = parse_name(".template").unwrap();
        assert_eq!(parsed.final_name, ".template");
        assert!(!parsed.is_template);
    }

    #[test]
    fn rejects_multiple_markers() {
        let err = parse_name("a.with-x.with-y.ts").unwrap_err();
        assert!(matches!(err, DomainError::MultipleVariantMarkers { .. }));
    }

    #[test]
    fn rejects_empty_tag() {
        let err = parse_name("a.with-.ts").unwrap_err();
        assert!(matches!(err, DomainError::EmptyVariantTag { .. }));
    }

    #[test]
    fn tag_validation() {
        assert!(VariantTag::new("api").is_ok());
        assert!(VariantTag::new("").is_err());
        assert!(VariantTag::new("a.b").is_err());
        assert!(VariantTag::new("a b").is_err());
    }

    #[test]
    fn active_variant_supersedes_base() {
        let dir = Path::new("src");
        let base = parse_name("App.tsx.template").unwrap();
        let variant = parse_name("App.with-api.tsx.template").unwrap();

        let mut index = VariantIndex::new(api());
        index.record(dir, &base);
        index.record(dir, &variant);

        assert_eq!(index.len(), 1);
        assert!(matches!(
            index.resolve(dir, &base),
            NameResolution::Skip(SkipReason::Superseded { .. })
        ));
        assert_eq!(
            index.resolve(dir, &variant),
            NameResolution::Emit("App.tsx".into())
        );
    }

    #[test]
    fn supersession_is_per_directory() {
        let variant = parse_name("App.with-api.tsx.template").unwrap();
        let base = parse_name("App.tsx.template").unwrap();

        let mut index = VariantIndex::new(api());
        index.record(Path::new("src"), &variant);

        assert!(index.resolve(Path::new("other"), &base).is_emit());
    }

    #[test]
    fn without_active_variant_marked_files_are_skipped() {
        let dir = Path::new("");
        let base = parse_name("App.tsx.template").unwrap();
        let variant = parse_name("App.with-api.tsx.template").unwrap();

        let mut index = VariantIndex::new(None);
        index.record(dir, &base);
        index.record(dir, &variant);

        assert!(index.is_empty());
        assert_eq!(
            index.resolve(dir, &base),
            NameResolution::Emit("App.tsx".into())
        );
        assert!(matches!(
            index.resolve(dir, &variant),
            NameResolution::Skip(SkipReason::NoActiveVariant { .. })
        ));
    }

    #[test]
    fn other_variant_is_skipped() {
        let dir = Path::new("");
        let mobile = parse_name("App.with-mobile.tsx").unwrap();
        let index = VariantIndex::new(api());
        assert!(matches!(
            index.resolve(dir, &mobile),
            NameResolution::Skip(SkipReason::InactiveVariant { .. })
        ));
    }
}
