//! The template library shipped at the repository root must stay generatable.

mod common;

use std::path::PathBuf;

use stencil_adapters::{BlueprintLoader, LocalFilesystem};
use stencil_core::application::{GenerateRequest, Orchestrator};
use stencil_core::domain::ProjectConfig;
use tempfile::TempDir;

use common::FakeRunner;

fn library() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn generate(name: &str, api: bool) -> (TempDir, PathBuf, usize) {
    let blueprint = BlueprintLoader::new(library()).load().unwrap();
    let out = TempDir::new().unwrap();
    let destination = out.path().join(name);
    let project = ProjectConfig::new(name, &destination)
        .unwrap()
        .with_module("web", true)
        .with_module("api", api);

    let templates = library();
    let req = GenerateRequest {
        project: &project,
        blueprint: &blueprint,
        templates: &templates,
        git: false,
        package_manager: None,
        force: false,
    };
    let report = Orchestrator::new(Box::new(LocalFilesystem::new()), Box::new(FakeRunner::new()))
        .generate(&req)
        .unwrap();
    (out, destination, report.files.len())
}

#[test]
fn blueprint_declares_web_and_api() {
    let blueprint = BlueprintLoader::new(library()).load().unwrap();
    assert_eq!(blueprint.module_names(), vec!["web", "api"]);
    assert_eq!(blueprint.roots.len(), 4);
}

#[test]
fn web_only_project() {
    let (_out, dest, files) = generate("acme-shop", false);

    assert_eq!(files, 13);
    assert!(!dest.join("apps/api").exists());

    let app = std::fs::read_to_string(dest.join("apps/web/src/App.tsx")).unwrap();
    assert!(app.contains("<h1>AcmeShop</h1>"));
    assert!(!app.contains("fetch"));

    let readme = std::fs::read_to_string(dest.join("README.md")).unwrap();
    assert!(readme.starts_with("# acme-shop\n"));
    assert!(!readme.contains("{{"));
}

#[test]
fn web_and_api_project() {
    let (_out, dest, files) = generate("acme-shop", true);

    assert_eq!(files, 15);

    let app = std::fs::read_to_string(dest.join("apps/web/src/App.tsx")).unwrap();
    assert!(app.contains("fetch(\"/api/health\")"));
    assert!(!dest.join("apps/web/src/App.with-api.tsx").exists());

    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dest.join("apps/web/package.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["dependencies"]["@acme-shop/api"], "workspace:*");
    assert_eq!(manifest["dependencies"]["react"], "18.3.1");

    let server = std::fs::read_to_string(dest.join("apps/api/src/server.ts")).unwrap();
    assert!(server.contains("acme-shop-api"));
}
