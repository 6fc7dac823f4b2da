//! Assembly planner properties, against real and in-memory filesystems.

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use stencil_adapters::{LocalFilesystem, MemoryFilesystem};
use stencil_core::application::{AssemblyPlanner, PlanOptions};
use stencil_core::domain::{DomainError, PatternSet, VariantTag, Variables};
use stencil_core::error::StencilError;
use tempfile::TempDir;

use common::{PNG, TEMPLATES, seed_library};

fn vars() -> Variables {
    Variables::new()
        .with("projectName", "demo")
        .with("scope", "demo")
        .with("year", "2024")
        .with("reactVersion", "18.3.1")
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// On-disk copy of the web app templates.
fn disk_web_root() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "package.json.template", br#"{"name": "@{{scope}}/web"}"#);
    write(root, "src/App.tsx.template", b"base {{projectName}}");
    write(root, "src/App.with-api.tsx.template", b"api {{projectName}}");
    write(root, "src/main.tsx", b"import App from './App';\n");
    write(root, "public/logo.png", PNG);
    write(root, "node_modules/react/index.js", b"{{notAVariable}}");
    temp
}

fn relative(paths: &[PathBuf], base: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(base).unwrap().display().to_string())
        .collect()
}

#[test]
fn dry_planning_is_idempotent_and_ordered() {
    let templates = disk_web_root();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("web");
    let vars = vars();
    let options = PlanOptions::new(&vars).dry_run(true);
    let planner = AssemblyPlanner::new(&LocalFilesystem);

    let first = planner.plan(templates.path(), &dest, &options).unwrap();
    let second = planner.plan(templates.path(), &dest, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        relative(&first, &dest),
        vec!["package.json", "public/logo.png", "src/App.tsx", "src/main.tsx"]
    );
    assert!(!dest.exists(), "dry run must not create directories");
}

#[test]
fn dry_and_real_produce_the_same_paths() {
    let templates = disk_web_root();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("web");
    let vars = vars();
    let planner = AssemblyPlanner::new(&LocalFilesystem);

    let dry = planner
        .plan(templates.path(), &dest, &PlanOptions::new(&vars).dry_run(true))
        .unwrap();
    let real = planner
        .plan(templates.path(), &dest, &PlanOptions::new(&vars))
        .unwrap();

    assert_eq!(dry, real);
    for path in &real {
        assert!(path.is_file(), "{} was not written", path.display());
    }
    assert_eq!(
        fs::read_to_string(dest.join("package.json")).unwrap(),
        r#"{"name": "@demo/web"}"#
    );
}

#[test]
fn variant_selection_is_exclusive() {
    let templates = disk_web_root();
    let vars = vars();
    let planner = AssemblyPlanner::new(&LocalFilesystem);

    for (variant, expected) in [(Some("api"), "api demo"), (None, "base demo")] {
        let out = TempDir::new().unwrap();
        let tag = variant.map(|v| VariantTag::new(v).unwrap());
        let paths = planner
            .plan(
                templates.path(),
                out.path(),
                &PlanOptions::new(&vars).with_variant(tag),
            )
            .unwrap();

        let apps: Vec<_> = paths
            .iter()
            .filter(|p| p.file_name().is_some_and(|n| n == "App.tsx"))
            .collect();
        assert_eq!(apps.len(), 1);
        assert_eq!(fs::read_to_string(apps[0]).unwrap(), expected);
        assert!(
            paths.iter().all(|p| !p.display().to_string().contains(".with-")),
            "variant marker leaked into {paths:?}"
        );
    }
}

#[test]
fn exclusion_wins_over_inclusion() {
    let fs_mem = MemoryFilesystem::new();
    fs_mem.add_file("/t/docs/guide.md", "guide");
    fs_mem.add_file("/t/node_modules/pkg/README.md", "{{boom}}");
    fs_mem.add_file("/t/.git/description.md", "{{boom}}");
    fs_mem.add_file("/t/main.ts", "code");

    let vars = vars();
    let options = PlanOptions::new(&vars)
        .with_include(Some(PatternSet::new(["*.md"]).unwrap()))
        .dry_run(true);
    let paths = AssemblyPlanner::new(&fs_mem)
        .plan(Path::new("/t"), Path::new("/out"), &options)
        .unwrap();

    assert_eq!(paths, vec![PathBuf::from("/out/docs/guide.md")]);
}

#[test]
fn binary_files_pass_through_untouched() {
    let templates = disk_web_root();
    let out = TempDir::new().unwrap();
    let vars = vars();
    AssemblyPlanner::new(&LocalFilesystem)
        .plan(templates.path(), out.path(), &PlanOptions::new(&vars))
        .unwrap();

    assert_eq!(fs::read(out.path().join("public/logo.png")).unwrap(), PNG);
}

#[test]
fn missing_variable_aborts_the_root() {
    let templates = disk_web_root();
    write(templates.path(), "src/env.ts.template", b"export const x = '{{apiUrl}}';");
    let out = TempDir::new().unwrap();
    let dest = out.path().join("web");
    let vars = vars();

    let err = AssemblyPlanner::new(&LocalFilesystem)
        .plan(templates.path(), &dest, &PlanOptions::new(&vars))
        .unwrap_err();

    match err {
        StencilError::Domain(DomainError::MissingVariable { name, file, known }) => {
            assert_eq!(name, "apiUrl");
            assert_eq!(file, Some(PathBuf::from("src/env.ts.template")));
            assert!(known.contains(&"projectName".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dest.exists(), "nothing may be written when planning fails");
}

#[test]
fn custom_excludes_replace_defaults() {
    let fs_mem = MemoryFilesystem::new();
    fs_mem.add_file("/t/dist/bundle.js", "x");
    fs_mem.add_file("/t/node_modules/a.js", "y");
    fs_mem.add_file("/t/index.js", "z");

    let vars = vars();
    let options = PlanOptions::new(&vars)
        .with_exclude(PatternSet::new(["dist"]).unwrap())
        .dry_run(true);
    let paths = AssemblyPlanner::new(&fs_mem)
        .plan(Path::new("/t"), Path::new("/o"), &options)
        .unwrap();

    assert_eq!(
        paths,
        vec![PathBuf::from("/o/index.js"), PathBuf::from("/o/node_modules/a.js")]
    );
}

#[test]
fn memory_library_plans_like_disk() {
    let fs_mem = MemoryFilesystem::new();
    seed_library(&fs_mem);
    let vars = vars();
    let paths = AssemblyPlanner::new(&fs_mem)
        .plan(
            &Path::new(TEMPLATES).join("root"),
            Path::new("/out"),
            &PlanOptions::new(&vars).dry_run(true),
        )
        .unwrap();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("/out/.husky/pre-commit"),
            PathBuf::from("/out/README.md"),
            PathBuf::from("/out/package.json"),
        ]
    );
    assert!(fs_mem.files_under("/out").is_empty());
}
