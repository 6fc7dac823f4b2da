//! Stencil Core - template resolution and assembly engine.
//!
//! This crate provides the domain and application layers for the Stencil
//! project scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (Orchestrator, AssemblyPlanner,       │
//! │    TreeWalk)                            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, CommandRunner, Progress)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      stencil-adapters (Infrastructure)  │
//! │ (LocalFilesystem, SystemCommandRunner)  │
//! └─────────────────────────────────────────┘
//!
//!   Domain Layer (pure): substitution, variants,
//!   patterns, plans, blueprint, manifest merge
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::prelude::*;
//!
//! let blueprint = Blueprint::default();
//! let project = ProjectConfig::new("demo", "./demo")?
//!     .with_module("web", true)
//!     .with_module("api", true);
//!
//! let orchestrator = Orchestrator::new(filesystem, runner);
//! let report = orchestrator.generate(&GenerateRequest {
//!     project: &project,
//!     blueprint: &blueprint,
//!     templates: Path::new("templates"),
//!     git: true,
//!     package_manager: Some("pnpm".into()),
//!     force: false,
//! })?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, AssemblyPlanner, GenerateRequest, GenerationReport, Orchestrator,
        PlanOptions, Step,
        ports::{
            CommandOutput, CommandRunner, CommandSpec, DirEntry, Filesystem, NoProgress,
            ProgressReporter,
        },
    };
    pub use crate::domain::{
        Blueprint, DomainError, PatternSet, ProjectConfig, VariantTag, Variables, render,
    };
    pub use crate::error::{ErrorCategory, StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
