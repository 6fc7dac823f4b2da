//! Fixtures for binary-level tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch workspace: a template library, a config file, and room for output.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        ws.write("config.toml", "[defaults]\ngit = false\ninstall = false\n");
        ws.write("templates/root/package.json.template", r#"{"name": "{{projectName}}", "private": true}"#);
        ws.write("templates/root/README.md", "# {{projectName}}\n");
        ws.write("templates/root/.husky/pre-commit", "#!/bin/sh\nnpx lint-staged\n");
        ws.write("templates/packages/config/package.json.template", r#"{"name": "@{{scope}}/config"}"#);
        ws.write("templates/apps/web/package.json.template", r#"{"name": "@{{scope}}/web"}"#);
        ws.write("templates/apps/web/src/App.tsx.template", "export const App = () => 'base';\n");
        ws.write(
            "templates/apps/web/src/App.with-api.tsx.template",
            "export const App = () => fetch('/api');\n",
        );
        ws.write("templates/apps/api/package.json.template", r#"{"name": "@{{scope}}/api"}"#);
        ws.write("templates/apps/api/src/server.ts.template", "// {{projectName}} api\n");
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.join(rel)).unwrap()
    }

    /// `stencil` running inside the workspace with its config and templates.
    pub fn stencil(&self) -> Command {
        let mut cmd = Command::cargo_bin("stencil").unwrap();
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.join("config.toml"));
        cmd
    }

    /// `stencil new <name> --templates templates --yes` plus `extra`.
    pub fn new_project(&self, name: &str, extra: &[&str]) -> Command {
        let mut cmd = self.stencil();
        cmd.args(["new", name, "--templates", "templates", "--yes"])
            .args(extra);
        cmd
    }
}
