use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::domain::blueprint::Blueprint;
use crate::domain::error::DomainError;
use crate::domain::substitution::{Variables, to_kebab_case, to_pascal_case, to_snake_case};

/// Immutable configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    name: String,
    destination: PathBuf,
    scope: String,
    modules: BTreeMap<String, bool>,
}

impl ProjectConfig {
    /// Validates the name and derives the scope (kebab-case name).
    pub fn new(name: impl Into<String>, destination: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_project_name(&name)?;
        let scope = to_kebab_case(&name);
        Ok(Self {
            name,
            destination: destination.into(),
            scope,
            modules: BTreeMap::new(),
        })
    }

    pub fn with_module(mut self, module: impl Into<String>, enabled: bool) -> Self {
        self.modules.insert(module.into(), enabled);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn modules(&self) -> &BTreeMap<String, bool> {
        &self.modules
    }

    /// Unlisted modules are off.
    pub fn is_enabled(&self, module: &str) -> bool {
        self.modules.get(module).copied().unwrap_or(false)
    }

    pub fn enabled_modules(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter(|(_, on)| **on)
            .map(|(m, _)| m.as_str())
    }

    /// Every selected module must exist in the blueprint.
    pub fn check_against(&self, blueprint: &Blueprint) -> Result<(), DomainError> {
        for module in self.enabled_modules() {
            if !blueprint.has_module(module) {
                return Err(DomainError::UnknownModule {
                    module: module.into(),
                    referenced_by: "the module selection".into(),
                });
            }
        }
        Ok(())
    }
}

fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}

impl Variables {
    /// The variable set for one run, using the current year.
    pub fn for_project(config: &ProjectConfig, blueprint: &Blueprint) -> Self {
        Self::for_project_in_year(config, blueprint, chrono::Local::now().year())
    }

    pub fn for_project_in_year(config: &ProjectConfig, blueprint: &Blueprint, year: i32) -> Self {
        let mut vars = Variables::new()
            .with("projectName", config.name())
            .with("projectNameSnake", to_snake_case(config.name()))
            .with("projectNameKebab", to_kebab_case(config.name()))
            .with("projectNamePascal", to_pascal_case(config.name()))
            .with("scope", config.scope())
            .with("year", year.to_string())
            .with("stencilVersion", crate::VERSION);

        for module in blueprint.module_names() {
            vars = vars.with(
                format!("{module}Enabled"),
                config.is_enabled(module).to_string(),
            );
        }
        for (key, version) in &blueprint.versions {
            vars = vars.with(format!("{key}Version"), version.as_str());
        }
        vars
    }
}
