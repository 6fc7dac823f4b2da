//! Blueprint: which template roots make up a project.
//!
//! A blueprint is plain data, usually read from `blueprint.toml` at the top of
//! a template library. It names the selectable modules, the template roots
//! (each optionally gated on a module and carrying a variant rule), and the
//! post-processing applied once all roots are copied.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::common::RelativePath;
use crate::domain::entities::project::ProjectConfig;
use crate::domain::error::DomainError;
use crate::domain::variant::VariantTag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Activates `tag` on a root when module `when` is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRule {
    pub tag: String,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRootSpec {
    pub name: String,
    /// Directory under the template library.
    pub source: PathBuf,
    /// Directory under the generated project.
    #[serde(default = "current_dir")]
    pub destination: PathBuf,
    /// Gate: included only when this module is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantRule>,
    /// Extra exclude patterns on top of the defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Adds `name: version` to the `dependencies` object of a generated JSON
/// manifest. `name` and `version` are rendered before insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub manifest: PathBuf,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub executables: Vec<PathBuf>,
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    #[serde(default)]
    pub roots: Vec<TemplateRootSpec>,
    #[serde(default)]
    pub manifest_dependencies: Vec<ManifestDependency>,
}

/// A root chosen for one run, with its variant already decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRoot {
    pub spec: TemplateRootSpec,
    pub variant: Option<VariantTag>,
}

impl Blueprint {
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut modules = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(DomainError::InvalidBlueprint(
                    "module name cannot be empty".into(),
                ));
            }
            if !modules.insert(module.name.as_str()) {
                return Err(DomainError::InvalidBlueprint(format!(
                    "module '{}' is declared twice",
                    module.name
                )));
            }
        }

        if self.roots.is_empty() {
            return Err(DomainError::InvalidBlueprint(
                "at least one template root is required".into(),
            ));
        }

        let mut roots = HashSet::new();
        for root in &self.roots {
            if !roots.insert(root.name.as_str()) {
                return Err(DomainError::InvalidBlueprint(format!(
                    "root '{}' is declared twice",
                    root.name
                )));
            }
            RelativePath::try_new(&root.source)?;
            RelativePath::try_new(&root.destination)?;

            let referenced_by = || format!("root '{}'", root.name);
            if let Some(module) = &root.module {
                self.require_module(module, referenced_by())?;
            }
            if let Some(rule) = &root.variant {
                VariantTag::new(rule.tag.clone())?;
                self.require_module(&rule.when, referenced_by())?;
            }
        }

        for dep in &self.manifest_dependencies {
            RelativePath::try_new(&dep.manifest)?;
            if let Some(when) = &dep.when {
                self.require_module(when, format!("dependency '{}'", dep.name))?;
            }
        }

        for exe in &self.executables {
            RelativePath::try_new(exe)?;
        }

        Ok(())
    }

    fn require_module(&self, module: &str, referenced_by: String) -> Result<(), DomainError> {
        if self.has_module(module) {
            Ok(())
        } else {
            Err(DomainError::UnknownModule {
                module: module.into(),
                referenced_by,
            })
        }
    }

    /// Roots included for `config`, in declaration order.
    pub fn select(&self, config: &ProjectConfig) -> Result<Vec<SelectedRoot>, DomainError> {
        let mut selected = Vec::new();
        for root in &self.roots {
            let included = root
                .module
                .as_deref()
                .is_none_or(|m| config.is_enabled(m));
            if !included {
                continue;
            }

            let variant = match &root.variant {
                Some(rule) if config.is_enabled(&rule.when) => {
                    Some(VariantTag::new(rule.tag.clone())?)
                }
                _ => None,
            };

            selected.push(SelectedRoot {
                spec: root.clone(),
                variant,
            });
        }
        Ok(selected)
    }

    /// Manifest dependencies that apply to `config`.
    pub fn dependencies_for<'a>(
        &'a self,
        config: &'a ProjectConfig,
    ) -> impl Iterator<Item = &'a ManifestDependency> + 'a {
        self.manifest_dependencies
            .iter()
            .filter(|d| d.when.as_deref().is_none_or(|m| config.is_enabled(m)))
    }
}

impl Default for Blueprint {
    /// The built-in web/api monorepo.
    fn default() -> Self {
        let module = |name: &str, description: &str| ModuleSpec {
            name: name.into(),
            description: Some(description.into()),
        };
        let root = |name: &str, source: &str, destination: &str| TemplateRootSpec {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            module: None,
            variant: None,
            exclude: Vec::new(),
            include: None,
        };

        let versions = [
            ("typescript", "5.6.3"),
            ("react", "18.3.1"),
            ("vite", "5.4.10"),
            ("fastify", "5.1.0"),
            ("node", "20"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            modules: vec![
                module("web", "Web front-end application"),
                module("api", "HTTP API service"),
            ],
            executables: vec![PathBuf::from(".husky/pre-commit")],
            versions,
            roots: vec![
                root("root", "root", "."),
                root("config", "packages/config", "packages/config"),
                TemplateRootSpec {
                    module: Some("web".into()),
                    variant: Some(VariantRule {
                        tag: "api".into(),
                        when: "api".into(),
                    }),
                    ..root("web", "apps/web", "apps/web")
                },
                TemplateRootSpec {
                    module: Some("api".into()),
                    ..root("api", "apps/api", "apps/api")
                },
            ],
            manifest_dependencies: vec![ManifestDependency {
                manifest: PathBuf::from("apps/web/package.json"),
                name: "@{{scope}}/api".into(),
                version: "workspace:*".into(),
                when: Some("api".into()),
            }],
        }
    }
}
