//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: directory listing, reads, writes, removal
//!   - `CommandRunner`: external tools (VCS, package managers)
//!   - `ProgressReporter`: step-counted progress display

pub mod output;

pub use output::{
    CommandOutput, CommandRunner, CommandSpec, DirEntry, Filesystem, NoProgress, ProgressReporter,
};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem, MockProgressReporter};
