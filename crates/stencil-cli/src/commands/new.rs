//! Implementation of the `stencil new` command.
//!
//! Responsibility: translate CLI arguments and configuration into a
//! `GenerateRequest`, run the orchestrator, and display results. No template
//! logic lives here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use stencil_adapters::{BlueprintLoader, LocalFilesystem, SystemCommandRunner};
use stencil_core::application::{GenerateRequest, GenerationReport, Orchestrator};
use stencil_core::domain::{Blueprint, ProjectConfig};
use stencil_core::error::StencilError;

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    progress::IndicatifProgress,
};

/// Execute the `stencil new` command.
///
/// 1. Resolve the project name and destination
/// 2. Load the blueprint from the template library
/// 3. Resolve modules, git and install settings (flags over config)
/// 4. Dry run: print the planned tree and stop
/// 5. Confirm unless `--yes` or `--quiet`
/// 6. Generate, then print the summary and next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (project_name, destination) = resolve_project_path(&args.name)?;

    let templates = config.templates_dir(args.templates.clone());
    let blueprint = BlueprintLoader::new(&templates).load()?;

    let selected = selected_modules(&args, &blueprint, &config);
    let project = build_project(&project_name, &destination, &blueprint, &selected)?;
    let git = config.defaults.git && !args.no_git;
    let package_manager = package_manager(&args, &config);

    debug!(
        templates = %templates.display(),
        modules = ?selected,
        git,
        package_manager = package_manager.as_deref().unwrap_or("none"),
        "request resolved"
    );

    let request = GenerateRequest {
        project: &project,
        blueprint: &blueprint,
        templates: &templates,
        git,
        package_manager: package_manager.clone(),
        force: args.force,
    };

    let show_progress = !global.quiet && output.is_interactive();
    let orchestrator = Orchestrator::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SystemCommandRunner::new()),
    )
    .with_progress(Box::new(IndicatifProgress::new(show_progress)));

    if args.dry_run {
        if !args.force && is_occupied(&destination) {
            return Err(CliError::ProjectExists { path: destination });
        }
        let paths = orchestrator.preview(&request)?;
        output.header(&format!("Dry run: '{project_name}' would contain"))?;
        output.tree(&destination, &paths)?;
        output.print("")?;
        output.info(&format!("{} files, nothing written", paths.len()))?;
        return Ok(());
    }

    if !global.quiet && !args.yes && output.is_interactive() {
        show_configuration(&project, &templates, git, package_manager.as_deref(), &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Creating '{project_name}'..."))?;
    info!(project = %project_name, path = %destination.display(), "generation started");

    let report = orchestrator.generate(&request)?;

    info!(run_id = %report.run_id, files = report.files.len(), "generation completed");
    print_summary(&project_name, &report, package_manager.as_deref(), &config, &output)?;

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split `NAME` into the project name (last segment) and the destination.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

fn is_occupied(path: &Path) -> bool {
    if path.is_dir() {
        fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(true)
    } else {
        path.exists()
    }
}

// ── Request construction ──────────────────────────────────────────────────────

/// Modules to enable: `--all-modules`, else `--module` flags, else config.
fn selected_modules(args: &NewArgs, blueprint: &Blueprint, config: &AppConfig) -> Vec<String> {
    if args.all_modules {
        blueprint
            .module_names()
            .into_iter()
            .map(String::from)
            .collect()
    } else if !args.modules.is_empty() {
        args.modules.clone()
    } else {
        config.defaults.modules.clone()
    }
}

/// Every blueprint module gets an explicit on/off entry. Selected names the
/// blueprint does not know are kept, so validation can report them.
fn build_project(
    name: &str,
    destination: &Path,
    blueprint: &Blueprint,
    selected: &[String],
) -> CliResult<ProjectConfig> {
    let mut project = ProjectConfig::new(name, destination).map_err(StencilError::from)?;
    for module in blueprint.module_names() {
        project = project.with_module(module, selected.iter().any(|s| s == module));
    }
    for extra in selected.iter().filter(|s| !blueprint.has_module(s)) {
        project = project.with_module(extra.as_str(), true);
    }
    project.check_against(blueprint).map_err(StencilError::from)?;
    Ok(project)
}

fn package_manager(args: &NewArgs, config: &AppConfig) -> Option<String> {
    if args.no_install || !config.defaults.install {
        return None;
    }
    Some(
        args.package_manager
            .clone()
            .unwrap_or_else(|| config.defaults.package_manager.clone()),
    )
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    project: &ProjectConfig,
    templates: &Path,
    git: bool,
    package_manager: Option<&str>,
    out: &OutputManager,
) -> CliResult<()> {
    let modules: Vec<&str> = project.enabled_modules().collect();
    let modules = if modules.is_empty() {
        "(shared roots only)".to_string()
    } else {
        modules.join(", ")
    };

    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", project.name()))?;
    out.print(&format!("  Scope:     @{}", project.scope()))?;
    out.print(&format!("  Modules:   {modules}"))?;
    out.print(&format!("  Templates: {}", templates.display()))?;
    out.print(&format!("  Git:       {}", if git { "yes" } else { "no" }))?;
    out.print(&format!("  Install:   {}", package_manager.unwrap_or("skipped")))?;
    out.print(&format!("  Location:  {}", project.destination().display()))?;
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    let answer = dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact_opt();
    confirmation(answer)
}

/// Escape, "no" and Ctrl-C all decline; only real terminal failures are errors.
#[cfg(feature = "interactive")]
fn confirmation(answer: Result<Option<bool>, dialoguer::Error>) -> CliResult<bool> {
    match answer {
        Ok(choice) => Ok(choice.unwrap_or(false)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
            debug!("prompt interrupted");
            Ok(false)
        }
        Err(dialoguer::Error::IO(e)) => Err(CliError::IoError {
            message: "confirmation prompt failed".into(),
            source: e,
        }),
    }
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    Ok(true)
}

fn print_summary(
    name: &str,
    report: &GenerationReport,
    package_manager: Option<&str>,
    config: &AppConfig,
    out: &OutputManager,
) -> CliResult<()> {
    out.success(&format!(
        "Project '{name}' created with {} files",
        report.files.len()
    ))?;

    for warning in &report.warnings {
        out.warning(warning)?;
    }

    out.print("")?;
    out.print("Next steps:")?;
    for step in next_steps(report, package_manager, config) {
        out.print(&format!("  {step}"))?;
    }
    Ok(())
}

fn next_steps(
    report: &GenerationReport,
    package_manager: Option<&str>,
    config: &AppConfig,
) -> Vec<String> {
    let mut steps = vec![format!("cd {}", report.destination.display())];
    if !report.installed {
        let pm = package_manager.unwrap_or(&config.defaults.package_manager);
        steps.push(format!("{pm} install"));
    }
    steps
}

// ── Tests ─────────────────────────────────────────────────────────────────────
