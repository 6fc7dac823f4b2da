// ============================================================================
// domain/error.rs - TEMPLATE DEFECTS AND VALIDATION
// ============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried through plan aggregation)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Template Defects
    // ========================================================================
    #[error(
        "missing variable '{name}'{}; known variables: {}",
        located(.file.as_deref()),
        .known.join(", ")
    )]
    MissingVariable {
        name: String,
        known: Vec<String>,
        file: Option<PathBuf>,
    },

    #[error("file name '{name}' carries more than one variant marker")]
    MultipleVariantMarkers { name: String },

    #[error("variant marker in '{name}' has an empty tag")]
    EmptyVariantTag { name: String },

    #[error("invalid variant tag '{tag}': {reason}")]
    InvalidVariantTag { tag: String, reason: String },

    #[error("two template files resolve to the same destination: {path}")]
    DuplicateDestination {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Blueprint / Configuration
    // ========================================================================
    #[error("Invalid blueprint: {0}")]
    InvalidBlueprint(String),

    #[error("unknown module '{module}' referenced by {referenced_by}")]
    UnknownModule {
        module: String,
        referenced_by: String,
    },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("manifest {path} could not be updated: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },
}

fn located(file: Option<&Path>) -> String {
    file.map(|f| format!(" in {}", f.display()))
        .unwrap_or_default()
}

impl DomainError {
    /// Attach the template file a substitution failure came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::MissingVariable { name, known, .. } => Self::MissingVariable {
                name,
                known,
                file: Some(path.into()),
            },
            other => other,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingVariable { name, file, .. } => vec![
                format!("Template references '{{{{{name}}}}}' but no such variable exists"),
                match file {
                    Some(f) => format!("Fix the placeholder in {}", f.display()),
                    None => "Fix the placeholder in the template set".into(),
                },
                "Add a matching entry under [versions] in blueprint.toml if it is a version".into(),
            ],
            Self::MultipleVariantMarkers { name } => vec![
                format!("Rename '{name}' so it has a single `.with-<tag>.` segment"),
                "Nested variants are not supported".into(),
            ],
            Self::EmptyVariantTag { name } => vec![
                format!("Give the marker in '{name}' a tag, e.g. `.with-api.`"),
            ],
            Self::DuplicateDestination { first, second, .. } => vec![
                format!("Both {} and {} produce the same file", first.display(), second.display()),
                "Remove or rename one of them in the template set".into(),
            ],
            Self::InvalidPattern { .. } => vec![
                "Patterns are file or directory names; `*` matches any run of characters".into(),
            ],
            Self::UnknownModule { module, .. } => vec![
                format!("Declare '{module}' in the blueprint `modules` list"),
                "Or remove the reference to it".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Start with a letter or number".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::InvalidManifest { path, .. } => vec![
                format!("Check that {} is a JSON object", path.display()),
            ],
            _ => vec!["The template set needs fixing; see the message above".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::InvalidVariantTag { .. } => {
                ErrorCategory::Validation
            }
            Self::UnknownModule { .. } => ErrorCategory::NotFound,
            Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::TemplateDefect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    TemplateDefect,
    NotFound,
    Internal,
}
