use std::path::{Path, PathBuf};

use crate::domain::entities::common::RelativePath;
use crate::domain::error::DomainError;
use crate::domain::variant::{ParsedName, TEMPLATE_SUFFIX, parse_name};

/// Extensions whose content is copied byte for byte.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "avif", "woff", "woff2", "ttf", "otf",
    "eot", "pdf", "zip", "gz", "tar", "mp3", "mp4", "wav", "webm",
];

/// How a candidate's content is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Carries the `.template` suffix: rendered, suffix stripped.
    Template,
    /// Plain text: rendered, name unchanged.
    Text,
    /// Opaque bytes: never rendered.
    Binary,
}

impl ContentKind {
    /// Classify a raw file name.
    ///
    /// The binary check wins over the template suffix, so `logo.png.template`
    /// is still copied verbatim.
    pub fn classify(raw_name: &str) -> Self {
        let stem = raw_name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(raw_name);
        if is_binary_name(stem) {
            Self::Binary
        } else if stem.len() != raw_name.len() && !stem.is_empty() {
            Self::Template
        } else {
            Self::Text
        }
    }
}

fn is_binary_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            BINARY_EXTENSIONS
                .iter()
                .any(|b| b.eq_ignore_ascii_case(ext))
        })
}

/// A file found while walking a template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Absolute (or caller-rooted) path to read from.
    pub source: PathBuf,
    /// Directory relative to the template root.
    pub dir: RelativePath,
    /// Name as it appears on disk, markers and suffix included.
    pub raw_name: String,
    pub name: ParsedName,
    pub kind: ContentKind,
}

impl CandidateFile {
    /// # Errors
    ///
    /// Malformed variant markers in `raw_name`.
    pub fn new(
        source: PathBuf,
        dir: RelativePath,
        raw_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let raw_name = raw_name.into();
        let name = parse_name(&raw_name)?;
        let kind = ContentKind::classify(&raw_name);
        Ok(Self {
            source,
            dir,
            raw_name,
            name,
            kind,
        })
    }

    /// Path relative to the template root, as found on disk.
    pub fn relative_source(&self) -> PathBuf {
        self.dir.as_path().join(&self.raw_name)
    }
}
