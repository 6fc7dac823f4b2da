//! Orchestrator - sequences template roots into one project.
//!
//! The run is a fixed list of steps, computed before anything is written so
//! that progress can be reported against a known total:
//!
//! 1. create the destination root
//! 2. copy every selected template root (shared roots first, then modules)
//! 3. post-process (manifest dependencies, executable hooks)
//! 4. hand off to external tools (git init, dependency install, commit)
//!
//! Any failure removes the destination and re-raises the original error.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::application::ApplicationError;
use crate::application::ports::{
    CommandRunner, CommandSpec, Filesystem, NoProgress, ProgressReporter,
};
use crate::application::services::planner::{AssemblyPlanner, PlanOptions};
use crate::domain::{
    AssemblyPlan, Blueprint, DomainError, PatternSet, ProjectConfig, SelectedRoot, Variables,
    manifest, render,
};
use crate::error::StencilResult;

/// Everything needed for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub project: &'a ProjectConfig,
    pub blueprint: &'a Blueprint,
    /// Base directory of the template library.
    pub templates: &'a Path,
    pub git: bool,
    /// Package manager to run `install` with; `None` skips installation.
    pub package_manager: Option<String>,
    /// Replace an existing non-empty destination.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateRoot,
    CopyRoot(SelectedRoot),
    PostProcess,
    InitGit,
    Install { package_manager: String },
    Commit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateRoot => f.write_str("Creating project directory"),
            Self::CopyRoot(root) => match &root.variant {
                Some(tag) => write!(f, "Copying {} templates (variant {tag})", root.spec.name),
                None => write!(f, "Copying {} templates", root.spec.name),
            },
            Self::PostProcess => f.write_str("Post-processing generated files"),
            Self::InitGit => f.write_str("Initializing git repository"),
            Self::Install { package_manager } => {
                write!(f, "Installing dependencies with {package_manager}")
            }
            Self::Commit => f.write_str("Creating initial commit"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub destination: PathBuf,
    /// Written files, in plan order.
    pub files: Vec<PathBuf>,
    /// Problems in best-effort steps.
    pub warnings: Vec<String>,
    pub git_initialized: bool,
    pub installed: bool,
}

/// Mutable state threaded through the steps of one run.
#[derive(Default)]
struct RunState {
    files: Vec<PathBuf>,
    origins: HashMap<PathBuf, PathBuf>,
    warnings: Vec<String>,
    git_initialized: bool,
    installed: bool,
}

impl RunState {
    /// Reject a destination already produced by an earlier root.
    fn claim(&mut self, source: &Path, plan: &AssemblyPlan) -> Result<(), DomainError> {
        for entry in plan.entries() {
            let origin = source.join(&entry.origin);
            if let Some(first) = self.origins.get(&entry.destination) {
                return Err(DomainError::DuplicateDestination {
                    path: entry.destination.clone(),
                    first: first.clone(),
                    second: origin,
                });
            }
            self.origins.insert(entry.destination.clone(), origin);
        }
        Ok(())
    }
}

pub struct Orchestrator {
    fs: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    progress: Box<dyn ProgressReporter>,
}

impl Orchestrator {
    pub fn new(fs: Box<dyn Filesystem>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            fs,
            runner,
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// The steps a request will run, in order.
    pub fn steps(&self, request: &GenerateRequest<'_>) -> StencilResult<Vec<Step>> {
        let mut steps = vec![Step::CreateRoot];
        steps.extend(
            request
                .blueprint
                .select(request.project)?
                .into_iter()
                .map(Step::CopyRoot),
        );
        steps.push(Step::PostProcess);
        if request.git {
            steps.push(Step::InitGit);
        }
        if let Some(pm) = &request.package_manager {
            steps.push(Step::Install {
                package_manager: pm.clone(),
            });
        }
        if request.git {
            steps.push(Step::Commit);
        }
        Ok(steps)
    }

    /// Destination paths a real run would write, without touching the disk.
    #[instrument(skip_all, fields(project = %request.project.name()))]
    pub fn preview(&self, request: &GenerateRequest<'_>) -> StencilResult<Vec<PathBuf>> {
        request.blueprint.validate()?;
        request.project.check_against(request.blueprint)?;
        let variables = Variables::for_project(request.project, request.blueprint);
        let planner = AssemblyPlanner::new(self.fs.as_ref());

        let mut state = RunState::default();
        for root in request.blueprint.select(request.project)? {
            let (source, plan) = self.plan_root(&planner, request, &root, &variables)?;
            state.claim(&source, &plan)?;
            state.files.extend(plan.paths());
        }
        info!(files = state.files.len(), "preview computed");
        Ok(state.files)
    }

    /// Generate the project. All-or-nothing.
    pub fn generate(&self, request: &GenerateRequest<'_>) -> StencilResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("generate", %run_id, project = %request.project.name());
        let _enter = span.enter();

        request.blueprint.validate()?;
        request.project.check_against(request.blueprint)?;
        let steps = self.steps(request)?;
        let variables = Variables::for_project(request.project, request.blueprint);
        let destination = request.project.destination();

        // Runs before the guarded region: a refused destination is never removed.
        self.prepare_destination(destination, request.force)?;

        let mut state = RunState::default();
        self.progress.begin(steps.len());
        let result = steps.iter().enumerate().try_for_each(|(i, step)| {
            self.progress.step(i + 1, &step.to_string());
            debug!(step = %step, "running step");
            self.execute(step, request, &variables, &mut state)
        });
        self.progress.finish();

        if let Err(e) = result {
            warn!(error = %e, "generation failed, rolling back");
            self.rollback(destination);
            return Err(e);
        }

        info!(files = state.files.len(), "project generated");
        Ok(GenerationReport {
            run_id,
            destination: destination.to_path_buf(),
            files: state.files,
            warnings: state.warnings,
            git_initialized: state.git_initialized,
            installed: state.installed,
        })
    }

    fn prepare_destination(&self, destination: &Path, force: bool) -> StencilResult<()> {
        if !self.fs.exists(destination) {
            return Ok(());
        }
        let empty = self.fs.is_dir(destination) && self.fs.is_empty_dir(destination)?;
        if empty {
            return Ok(());
        }
        if !force {
            return Err(ApplicationError::ProjectExists {
                path: destination.to_path_buf(),
            }
            .into());
        }
        warn!(path = %destination.display(), "removing existing destination (--force)");
        self.fs.remove_dir_all(destination)
    }

    fn execute(
        &self,
        step: &Step,
        request: &GenerateRequest<'_>,
        variables: &Variables,
        state: &mut RunState,
    ) -> StencilResult<()> {
        let destination = request.project.destination();
        match step {
            Step::CreateRoot => self.fs.create_dir_all(destination),
            Step::CopyRoot(root) => {
                let planner = AssemblyPlanner::new(self.fs.as_ref());
                let (source, plan) = self.plan_root(&planner, request, root, variables)?;
                state.claim(&source, &plan)?;
                planner.write(&plan)?;
                state.files.extend(plan.paths());
                Ok(())
            }
            Step::PostProcess => self.post_process(request, variables, state),
            Step::InitGit => {
                let init = CommandSpec::new("git", ["init"], destination);
                match self.run_checked(&init) {
                    Ok(()) => state.git_initialized = true,
                    Err(e) => state.warnings.push(format!("git init skipped: {e}")),
                }
                Ok(())
            }
            Step::Install { package_manager } => {
                let install = CommandSpec::new(package_manager.as_str(), ["install"], destination);
                self.run_checked(&install)?;
                state.installed = true;
                Ok(())
            }
            Step::Commit => {
                if !state.git_initialized {
                    return Ok(());
                }
                let add = CommandSpec::new("git", ["add", "-A"], destination);
                let commit = CommandSpec::new(
                    "git",
                    ["commit", "-q", "-m", "Initial commit from stencil"],
                    destination,
                );
                if let Err(e) = self.run_checked(&add).and_then(|()| self.run_checked(&commit)) {
                    state.warnings.push(format!("initial commit skipped: {e}"));
                }
                Ok(())
            }
        }
    }

    fn plan_root(
        &self,
        planner: &AssemblyPlanner<'_>,
        request: &GenerateRequest<'_>,
        root: &SelectedRoot,
        variables: &Variables,
    ) -> StencilResult<(PathBuf, AssemblyPlan)> {
        let source = request.templates.join(&root.spec.source);
        let out = join_relative(request.project.destination(), &root.spec.destination);

        let exclude = PatternSet::default_excludes().extend(PatternSet::new(&root.spec.exclude)?);
        let include = root
            .spec
            .include
            .as_ref()
            .map(PatternSet::new)
            .transpose()?;
        let options = PlanOptions::new(variables)
            .with_exclude(exclude)
            .with_include(include)
            .with_variant(root.variant.clone());

        let plan = planner.build(&source, &out, &options)?;
        debug!(root = %root.spec.name, files = plan.len(), "planned root");
        Ok((root.spec.source.clone(), plan))
    }

    fn post_process(
        &self,
        request: &GenerateRequest<'_>,
        variables: &Variables,
        state: &mut RunState,
    ) -> StencilResult<()> {
        let destination = request.project.destination();

        for dep in request.blueprint.dependencies_for(request.project) {
            let path = join_relative(destination, &dep.manifest);
            if !self.fs.exists(&path) {
                debug!(manifest = %path.display(), "manifest not generated, skipping dependency");
                continue;
            }
            let name = render(&dep.name, variables)?;
            let version = render(&dep.version, variables)?;
            let bytes = self.fs.read_file(&path)?;
            let text = String::from_utf8(bytes).map_err(|_| DomainError::InvalidManifest {
                path: dep.manifest.clone(),
                reason: "not valid UTF-8".into(),
            })?;
            let updated = manifest::add_dependency(&dep.manifest, &text, &name, &version)?;
            self.fs.write_file(&path, updated.as_bytes())?;
            debug!(manifest = %path.display(), dependency = %name, "added dependency");
        }

        for exe in &request.blueprint.executables {
            let path = join_relative(destination, exe);
            if !self.fs.exists(&path) {
                continue;
            }
            if let Err(e) = self.fs.set_permissions(&path, true) {
                state
                    .warnings
                    .push(format!("could not mark {} executable: {e}", exe.display()));
            }
        }
        Ok(())
    }

    /// Run a command; non-zero exit becomes `CommandFailed`.
    fn run_checked(&self, command: &CommandSpec) -> StencilResult<()> {
        let output = self.runner.run(command)?;
        if output.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                command: command.to_string(),
                status: output.status,
                stderr: output.stderr,
            }
            .into())
        }
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if !self.fs.exists(root) {
            return;
        }
        if let Err(e) = self.fs.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!(path = %root.display(), "Rollback successful");
        }
    }
}

/// Join keeping only normal components, so `.` maps to `base` itself.
fn join_relative(base: &Path, relative: &Path) -> PathBuf {
    relative
        .components()
        .fold(base.to_path_buf(), |mut acc, component| {
            if let Component::Normal(segment) = component {
                acc.push(segment);
            }
            acc
        })
}
