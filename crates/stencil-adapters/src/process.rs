//! External process adapter.

use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use stencil_core::application::ApplicationError;
use stencil_core::application::ports::{CommandOutput, CommandRunner, CommandSpec};
use stencil_core::error::StencilResult;

/// Runs commands with `std::process`, blocking until they exit.
///
/// Stdout is discarded; stderr is captured for error reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %command.cwd.display()))]
    fn run(&self, command: &CommandSpec) -> StencilResult<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ApplicationError::CommandNotFound {
                    program: command.program.clone(),
                },
                _ => ApplicationError::CommandFailed {
                    command: command.to_string(),
                    status: None,
                    stderr: e.to_string(),
                },
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(status = ?result.status, "command finished");
        Ok(result)
    }
}
