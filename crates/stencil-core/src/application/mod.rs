//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: the walker, the assembly planner and the orchestrator
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Template rules (substitution, variants, patterns) live in `crate::domain`;
//! this layer sequences them and performs I/O through ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AssemblyPlanner, GenerateRequest, GenerationReport, Orchestrator, PlanOptions, Step, TreeWalk,
    WalkFilter,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandOutput, CommandRunner, CommandSpec, DirEntry, Filesystem, NoProgress, ProgressReporter,
};

pub use error::{ApplicationError, FsErrorKind};
