//! Shared fixtures for adapter integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use stencil_adapters::MemoryFilesystem;
use stencil_core::application::ApplicationError;
use stencil_core::application::ports::{CommandOutput, CommandRunner, CommandSpec};
use stencil_core::error::StencilResult;

pub const TEMPLATES: &str = "/templates";
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'{', b'{', b'x', b'}', b'}', 0x00];

/// A template library shaped like the built-in blueprint expects.
pub fn seed_library(fs: &MemoryFilesystem) {
    let t = Path::new(TEMPLATES);
    fs.add_file(
        t.join("root/package.json.template"),
        r#"{"name": "{{projectName}}", "private": true}"#,
    );
    fs.add_file(t.join("root/README.md"), "# {{projectName}}\n");
    fs.add_file(t.join("root/.husky/pre-commit"), "#!/bin/sh\n");
    fs.add_file(t.join("root/node_modules/junk.md"), "{{undefinedThing}}");
    fs.add_file(
        t.join("packages/config/package.json.template"),
        r#"{"name": "@{{scope}}/config"}"#,
    );
    fs.add_file(
        t.join("apps/web/package.json.template"),
        r#"{"name": "@{{scope}}/web", "dependencies": {"react": "{{reactVersion}}"}}"#,
    );
    fs.add_file(t.join("apps/web/src/App.tsx.template"), "base {{projectName}}");
    fs.add_file(
        t.join("apps/web/src/App.with-api.tsx.template"),
        "api {{projectName}}",
    );
    fs.add_file(t.join("apps/web/public/logo.png"), PNG);
    fs.add_file(
        t.join("apps/api/package.json.template"),
        r#"{"name": "@{{scope}}/api"}"#,
    );
    fs.add_file(t.join("apps/api/src/server.ts.template"), "listen {{projectName}}");
}

/// Command runner that records invocations and fails on request.
#[derive(Clone, Default)]
pub struct FakeRunner {
    pub calls: Arc<Mutex<Vec<String>>>,
    missing: Vec<String>,
    failing: Vec<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `program` is not installed.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.into());
        self
    }

    /// Make `program` exit with status 1.
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &CommandSpec) -> StencilResult<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        if self.missing.contains(&command.program) {
            return Err(ApplicationError::CommandNotFound {
                program: command.program.clone(),
            }
            .into());
        }
        let failed = self.failing.contains(&command.program);
        Ok(CommandOutput {
            status: Some(if failed { 1 } else { 0 }),
            stderr: if failed { "simulated failure".into() } else { String::new() },
        })
    }
}
