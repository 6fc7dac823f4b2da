//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `STENCIL__SECTION__KEY`
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "STENCIL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub package_manager: String,
    pub git: bool,
    pub install: bool,
    /// Modules enabled when `new` gets no `--module` flags.
    pub modules: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            package_manager: "pnpm".into(),
            git: true,
            install: true,
            modules: vec!["web".into()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template library used when `--templates` is not given.
    pub path: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("templates"),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "loading configuration");
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        let env = env
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("defaults.modules");

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("rs", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }

    /// Platform data directory, where an installed template library lives.
    pub fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("rs", "stencil", "stencil")
            .map(|d| d.data_dir().to_path_buf())
    }

    /// Template library for this run.
    ///
    /// `--templates` is used as given. Otherwise a relative `templates.path`
    /// is tried against the working directory, then against [`Self::data_dir`].
    pub fn templates_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        match flag {
            Some(dir) => dir,
            None => resolve_library(&self.templates.path, Self::data_dir().as_deref()),
        }
    }

    /// Look up a dotted key such as `defaults.git`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "defaults.package_manager" => self.defaults.package_manager.clone(),
            "defaults.git" => self.defaults.git.to_string(),
            "defaults.install" => self.defaults.install.to_string(),
            "defaults.modules" => self.defaults.modules.join(","),
            "output.no_color" => self.output.no_color.to_string(),
            "templates.path" => self.templates.path.display().to_string(),
            _ => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        };
        Ok(value)
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn resolve_library(configured: &Path, data_dir: Option<&Path>) -> PathBuf {
    if configured.is_absolute() || configured.is_dir() {
        return configured.to_path_buf();
    }
    match data_dir.map(|dir| dir.join(configured)) {
        Some(installed) if installed.is_dir() => {
            debug!(path = %installed.display(), "using installed template library");
            installed
        }
        _ => configured.to_path_buf(),
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
