//! Assembly planner: one template root in, an ordered plan out.
//!
//! Planning runs in two passes. The first enumerates every candidate and
//! indexes the names provided by the active variant. The second decides, per
//! file, whether it is emitted, under which name, and with which content.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::application::ports::Filesystem;
use crate::application::services::walker::{TreeWalk, WalkFilter};
use crate::domain::{
    AssemblyPlan, CandidateFile, ContentKind, NameResolution, PatternSet, PlannedContent,
    PlannedEntry, VariantIndex, VariantTag, Variables, render,
};
use crate::error::StencilResult;

/// Options for planning one template root.
#[derive(Debug, Clone)]
pub struct PlanOptions<'a> {
    pub variables: &'a Variables,
    pub exclude: PatternSet,
    pub include: Option<PatternSet>,
    pub variant: Option<VariantTag>,
    pub dry_run: bool,
}

impl<'a> PlanOptions<'a> {
    /// Default excludes, no include filter, base variant, real mode.
    pub fn new(variables: &'a Variables) -> Self {
        Self {
            variables,
            exclude: PatternSet::default_excludes(),
            include: None,
            variant: None,
            dry_run: false,
        }
    }

    pub fn with_variant(mut self, variant: Option<VariantTag>) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_exclude(mut self, exclude: PatternSet) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_include(mut self, include: Option<PatternSet>) -> Self {
        self.include = include;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

pub struct AssemblyPlanner<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> AssemblyPlanner<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Plan `root` into `destination`.
    ///
    /// In dry mode nothing is written and no directory is created. In real
    /// mode every entry is written. Both return the same destination paths
    /// for identical inputs.
    #[instrument(skip_all, fields(root = %root.display(), dry_run = options.dry_run))]
    pub fn plan(
        &self,
        root: &Path,
        destination: &Path,
        options: &PlanOptions<'_>,
    ) -> StencilResult<Vec<PathBuf>> {
        let plan = self.build(root, destination, options)?;
        if !options.dry_run {
            self.write(&plan)?;
        }
        Ok(plan.paths())
    }

    /// Compute the full plan, contents included, without writing.
    pub fn build(
        &self,
        root: &Path,
        destination: &Path,
        options: &PlanOptions<'_>,
    ) -> StencilResult<AssemblyPlan> {
        if !self.fs.is_dir(root) {
            return Err(ApplicationError::TemplateRootMissing {
                path: root.to_path_buf(),
            }
            .into());
        }

        let filter = WalkFilter {
            exclude: options.exclude.clone(),
            include: options.include.clone(),
        };

        // Pass 1: enumerate everything and index the active variant's names.
        let candidates = TreeWalk::new(self.fs, root, &filter).collect::<StencilResult<Vec<_>>>()?;
        let mut index = VariantIndex::new(options.variant.clone());
        for candidate in &candidates {
            index.record(candidate.dir.as_path(), &candidate.name);
        }
        debug!(
            candidates = candidates.len(),
            variant_names = index.len(),
            "enumerated template root"
        );

        // Pass 2: resolve names and transform content.
        let mut plan = AssemblyPlan::new();
        for candidate in candidates {
            let final_name = match index.resolve(candidate.dir.as_path(), &candidate.name) {
                NameResolution::Emit(name) => name,
                NameResolution::Skip(reason) => {
                    debug!(file = %candidate.relative_source().display(), %reason, "skipped");
                    continue;
                }
            };

            let content = self.content_for(&candidate, options.variables)?;
            plan.push(PlannedEntry {
                destination: destination.join(candidate.dir.as_path()).join(final_name),
                origin: candidate.relative_source(),
                content,
            })?;
        }

        Ok(plan)
    }

    fn content_for(
        &self,
        candidate: &CandidateFile,
        variables: &Variables,
    ) -> StencilResult<PlannedContent> {
        let bytes = self.fs.read_file(&candidate.source)?;
        let origin = || candidate.relative_source();

        match candidate.kind {
            ContentKind::Binary => Ok(PlannedContent::Binary(bytes)),
            ContentKind::Template => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| ApplicationError::NotUtf8 { path: origin() })?;
                let rendered = render(&text, variables).map_err(|e| e.in_file(origin()))?;
                Ok(PlannedContent::Text(rendered))
            }
            ContentKind::Text => match String::from_utf8(bytes) {
                Ok(text) => {
                    let rendered = render(&text, variables).map_err(|e| e.in_file(origin()))?;
                    Ok(PlannedContent::Text(rendered))
                }
                // Unknown binary formats pass through untouched.
                Err(e) => Ok(PlannedContent::Binary(e.into_bytes())),
            },
        }
    }

    /// Create directories and write every entry.
    pub fn write(&self, plan: &AssemblyPlan) -> StencilResult<()> {
        for entry in plan.entries() {
            if let Some(parent) = entry.destination.parent() {
                self.fs.create_dir_all(parent)?;
            }
            self.fs
                .write_file(&entry.destination, entry.content.as_bytes())?;
        }
        debug!(files = plan.len(), "wrote plan");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{DirEntry, MockFilesystem};
    use crate::domain::DomainError;
    use crate::error::StencilError;

    fn vars() -> Variables {
        Variables::new().with("projectName", "demo")
    }

    /// Root `/t` with a base and an `api` variant of `App.tsx`.
    fn variant_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_read_dir().returning(|_| {
            Ok(vec![
                DirEntry::file("App.tsx.template"),
                DirEntry::file("App.with-api.tsx.template"),
            ])
        });
        fs.expect_read_file().returning(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            Ok(if name.contains("with-api") {
                b"api {{projectName}}".to_vec()
            } else {
                b"base {{projectName}}".to_vec()
            })
        });
        fs
    }

    #[test]
    fn dry_run_writes_nothing() {
        // No create/write expectations: any write panics.
        let fs = variant_fs();
        let vars = vars();
        let options = PlanOptions::new(&vars).dry_run(true);
        let paths = AssemblyPlanner::new(&fs)
            .plan(Path::new("/t"), Path::new("/out"), &options)
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("/out/App.tsx")]);
    }

    #[test]
    fn active_variant_replaces_base_content() {
        let fs = variant_fs();
        let vars = vars();
        let options = PlanOptions::new(&vars).with_variant(Some(VariantTag::new("api").unwrap()));
        let plan = AssemblyPlanner::new(&fs)
            .build(Path::new("/t"), Path::new("/out"), &options)
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.entries()[0].content,
            PlannedContent::Text("api demo".into())
        );
    }

    #[test]
    fn base_content_without_variant() {
        let fs = variant_fs();
        let vars = vars();
        let plan = AssemblyPlanner::new(&fs)
            .build(Path::new("/t"), Path::new("/out"), &PlanOptions::new(&vars))
            .unwrap();
        assert_eq!(
            plan.entries()[0].content,
            PlannedContent::Text("base demo".into())
        );
    }

    #[test]
    fn missing_variable_names_the_file() {
        let fs = variant_fs();
        let empty = Variables::new();
        let err = AssemblyPlanner::new(&fs)
            .build(Path::new("/t"), Path::new("/out"), &PlanOptions::new(&empty))
            .unwrap_err();
        match err {
            StencilError::Domain(DomainError::MissingVariable { file, .. }) => {
                assert_eq!(file, Some(PathBuf::from("App.tsx.template")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| false);
        let vars = vars();
        let err = AssemblyPlanner::new(&fs)
            .plan(Path::new("/nope"), Path::new("/out"), &PlanOptions::new(&vars))
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::TemplateRootMissing { .. })
        ));
    }

    #[test]
    fn plain_and_suffixed_twins_collide() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_read_dir().returning(|_| {
            Ok(vec![
                DirEntry::file("README.md"),
                DirEntry::file("README.md.template"),
            ])
        });
        fs.expect_read_file().returning(|_| Ok(b"x".to_vec()));
        let vars = vars();
        let err = AssemblyPlanner::new(&fs)
            .build(Path::new("/t"), Path::new("/out"), &PlanOptions::new(&vars))
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Domain(DomainError::DuplicateDestination { .. })
        ));
    }

    #[test]
    fn undecodable_text_passes_through() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_read_dir()
            .returning(|_| Ok(vec![DirEntry::file("blob.dat")]));
        fs.expect_read_file().returning(|_| Ok(vec![0xff, 0xfe, b'{', b'{']));
        let vars = vars();
        let plan = AssemblyPlanner::new(&fs)
            .build(Path::new("/t"), Path::new("/out"), &PlanOptions::new(&vars))
            .unwrap();
        assert_eq!(
            plan.entries()[0].content,
            PlannedContent::Binary(vec![0xff, 0xfe, b'{', b'{'])
        );
    }
}
