//! Application services - orchestrate use cases.
//!
//! - `walker`: lazy enumeration of a template root
//! - `planner`: one root → ordered plan (dry or real)
//! - `orchestrator`: all roots of a project, post-processing, rollback

pub mod orchestrator;
pub mod planner;
pub mod walker;

pub use orchestrator::{GenerateRequest, GenerationReport, Orchestrator, Step};
pub use planner::{AssemblyPlanner, PlanOptions};
pub use walker::{TreeWalk, WalkFilter};
