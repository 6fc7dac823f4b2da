//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not template
//! defects. Template defects are `DomainError` from `crate::domain`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Classified cause of a filesystem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    PermissionDenied,
    /// The path, or one of its parents, does not exist.
    NotFound,
    StorageFull,
    TooManyOpenFiles,
    AlreadyExists,
    Other,
}

impl FsErrorKind {
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::StorageFull => Self::StorageFull,
            _ => match err.raw_os_error() {
                // EMFILE / ENFILE
                Some(24) | Some(23) => Self::TooManyOpenFiles,
                // ENOSPC
                Some(28) => Self::StorageFull,
                _ => Self::Other,
            },
        }
    }
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::StorageFull => "no space left on device",
            Self::TooManyOpenFiles => "too many open files",
            Self::AlreadyExists => "already exists",
            Self::Other => "I/O error",
        };
        f.write_str(s)
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path} ({kind}): {reason}")]
    Filesystem {
        kind: FsErrorKind,
        path: PathBuf,
        reason: String,
    },

    /// A template root named by the blueprint is absent.
    #[error("Template root not found: {path}")]
    TemplateRootMissing { path: PathBuf },

    /// A `.template` file is not valid UTF-8.
    #[error("Template file is not valid UTF-8: {path}")]
    NotUtf8 { path: PathBuf },

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// External tool could not be started.
    #[error("'{program}' is not installed or not on PATH")]
    CommandNotFound { program: String },

    /// External tool ran and reported failure.
    #[error("'{command}' failed{}", exit_suffix(.status, .stderr))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn exit_suffix(status: &Option<i32>, stderr: &str) -> String {
    let mut out = match *status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    };
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        out.push_str(": ");
        out.push_str(stderr);
    }
    out
}

impl ApplicationError {
    pub fn filesystem(err: &io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Filesystem {
            kind: FsErrorKind::classify(err),
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { kind, path, .. } => match kind {
                FsErrorKind::PermissionDenied => vec![
                    format!("Check write permissions for {}", path.display()),
                    "Choose a destination inside a directory you own".into(),
                ],
                FsErrorKind::NotFound => vec![
                    format!("Ensure the parent directory of {} exists", path.display()),
                ],
                FsErrorKind::StorageFull => vec![
                    "Free up disk space and try again".into(),
                ],
                FsErrorKind::TooManyOpenFiles => vec![
                    "Raise the open-file limit (e.g. `ulimit -n 4096`) and retry".into(),
                ],
                FsErrorKind::AlreadyExists => vec![
                    format!("Remove {} or choose another destination", path.display()),
                ],
                FsErrorKind::Other => vec![
                    format!("Failed to access: {}", path.display()),
                ],
            },
            Self::TemplateRootMissing { path } => vec![
                format!("Expected a template directory at {}", path.display()),
                "Point --templates at a template library".into(),
                "Or fix the `source` entry in blueprint.toml".into(),
            ],
            Self::NotUtf8 { path } => vec![
                format!("Re-save {} as UTF-8", path.display()),
                "Or drop the `.template` suffix so it is copied verbatim".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to replace it (destructive)".into(),
                "Choose a different project name".into(),
            ],
            Self::CommandNotFound { program } => vec![
                format!("Install '{program}' and make sure it is on PATH"),
                "Or skip this step (see --no-install / --no-git)".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Run `{command}` manually inside the project to see full output"),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Filesystem { .. } => ErrorCategory::Filesystem,
            Self::TemplateRootMissing { .. } => ErrorCategory::NotFound,
            Self::NotUtf8 { .. } => ErrorCategory::TemplateDefect,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::CommandNotFound { .. } | Self::CommandFailed { .. } => ErrorCategory::Command,
        }
    }
}
