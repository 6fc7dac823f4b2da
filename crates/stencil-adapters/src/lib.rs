//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod blueprint_loader;
pub mod filesystem;
pub mod process;

// Re-export commonly used adapters
pub use blueprint_loader::{BLUEPRINT_FILE, BlueprintLoader};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::SystemCommandRunner;
