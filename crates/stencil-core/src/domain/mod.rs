// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stencil.
//!
//! Pure logic only: placeholder substitution, variant resolution, name
//! patterns, plan entities, the blueprint model and manifest editing. Nothing
//! here touches the filesystem or spawns processes; the application layer
//! reaches those through ports.

pub mod blueprint;
pub mod entities;
pub mod error;
pub mod manifest;
pub mod patterns;
pub mod substitution;
pub mod variant;

pub use blueprint::{
    Blueprint, ManifestDependency, ModuleSpec, SelectedRoot, TemplateRootSpec, VariantRule,
};
pub use entities::{
    AssemblyPlan, BINARY_EXTENSIONS, CandidateFile, ContentKind, PlannedContent, PlannedEntry,
    ProjectConfig, RelativePath,
};
pub use error::{DomainError, ErrorCategory};
pub use patterns::{DEFAULT_EXCLUDES, NamePattern, PatternSet};
pub use substitution::{Variables, render};
pub use variant::{
    NameResolution, ParsedName, SkipReason, TEMPLATE_SUFFIX, VARIANT_PREFIX, VariantIndex,
    VariantTag, parse_name,
};
