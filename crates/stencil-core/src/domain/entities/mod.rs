pub mod candidate;
pub mod common;
pub mod plan;
pub mod project;

pub use crate::domain::DomainError;
pub use candidate::{BINARY_EXTENSIONS, CandidateFile, ContentKind};
pub use common::RelativePath;
pub use plan::{AssemblyPlan, PlannedContent, PlannedEntry};
pub use project::ProjectConfig;
