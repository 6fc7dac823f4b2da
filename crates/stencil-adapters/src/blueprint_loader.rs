//! Filesystem-based blueprint loader.
//!
//! Reads `blueprint.toml` from the top of a template library and turns it
//! into a validated [`Blueprint`].
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── blueprint.toml      ← optional; built-in web/api blueprint if absent
//! ├── root/
//! ├── packages/config/
//! └── apps/
//!     ├── web/
//!     └── api/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use stencil_core::application::ApplicationError;
use stencil_core::domain::{Blueprint, DomainError};
use stencil_core::error::StencilResult;

/// File name looked up at the top of a template library.
pub const BLUEPRINT_FILE: &str = "blueprint.toml";

pub struct BlueprintLoader {
    templates_dir: PathBuf,
}

impl BlueprintLoader {
    /// Create a loader pointed at `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn blueprint_path(&self) -> PathBuf {
        self.templates_dir.join(BLUEPRINT_FILE)
    }

    /// Load and validate the blueprint.
    ///
    /// # Errors
    ///
    /// - `TemplateRootMissing` if the library directory does not exist.
    /// - `InvalidBlueprint` if the file cannot be read or parsed.
    /// - Any validation error of the parsed blueprint.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load(&self) -> StencilResult<Blueprint> {
        if !self.templates_dir.is_dir() {
            return Err(ApplicationError::TemplateRootMissing {
                path: self.templates_dir.clone(),
            }
            .into());
        }

        let path = self.blueprint_path();
        let blueprint = if path.is_file() {
            let raw = fs::read_to_string(&path).map_err(|e| {
                DomainError::InvalidBlueprint(format!("failed to read '{}': {e}", path.display()))
            })?;
            parse(&raw).map_err(|e| {
                DomainError::InvalidBlueprint(format!("failed to parse '{}': {e}", path.display()))
            })?
        } else {
            debug!("no blueprint.toml, using built-in blueprint");
            Blueprint::default()
        };

        blueprint.validate()?;
        debug!(
            modules = blueprint.modules.len(),
            roots = blueprint.roots.len(),
            "blueprint loaded"
        );
        Ok(blueprint)
    }
}

/// Parse blueprint TOML without validating it.
pub fn parse(raw: &str) -> Result<Blueprint, toml::de::Error> {
    toml::from_str(raw)
}
