//! Lazy depth-first enumeration of a template root.

use std::path::{Path, PathBuf};
use std::vec;

use tracing::trace;

use crate::application::ports::{DirEntry, Filesystem};
use crate::domain::{CandidateFile, PatternSet, RelativePath};
use crate::error::StencilResult;

/// Which names the walk keeps.
///
/// Exclusion applies to files and directories and is checked first; an
/// excluded directory is never listed. Inclusion, when present, applies to
/// files only.
#[derive(Debug, Clone)]
pub struct WalkFilter {
    pub exclude: PatternSet,
    pub include: Option<PatternSet>,
}

impl Default for WalkFilter {
    fn default() -> Self {
        Self {
            exclude: PatternSet::default_excludes(),
            include: None,
        }
    }
}

impl WalkFilter {
    fn keeps_file(&self, name: &str) -> bool {
        self.include.as_ref().is_none_or(|inc| inc.matches(name))
    }
}

struct Frame {
    dir: RelativePath,
    entries: vec::IntoIter<DirEntry>,
}

/// Pre-order, name-ordered walk yielding [`CandidateFile`]s.
///
/// Directories are listed only when reached. The iterator stops after the
/// first error.
pub struct TreeWalk<'a> {
    fs: &'a dyn Filesystem,
    root: PathBuf,
    filter: &'a WalkFilter,
    stack: Vec<Frame>,
    started: bool,
    done: bool,
}

impl<'a> TreeWalk<'a> {
    pub fn new(fs: &'a dyn Filesystem, root: impl Into<PathBuf>, filter: &'a WalkFilter) -> Self {
        Self {
            fs,
            root: root.into(),
            filter,
            stack: Vec::new(),
            started: false,
            done: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&mut self, dir: RelativePath) -> StencilResult<()> {
        let entries = self.fs.read_dir(&self.root.join(dir.as_path()))?;
        self.stack.push(Frame {
            dir,
            entries: entries.into_iter(),
        });
        Ok(())
    }

    fn advance(&mut self) -> StencilResult<Option<CandidateFile>> {
        if !self.started {
            self.started = true;
            self.open(RelativePath::root())?;
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            let dir = frame.dir.clone();

            if self.filter.exclude.matches(&entry.name) {
                trace!(dir = %dir, name = %entry.name, "excluded");
                continue;
            }

            if entry.is_dir {
                let child = dir.join(&entry.name)?;
                self.open(child)?;
                continue;
            }

            if !self.filter.keeps_file(&entry.name) {
                trace!(dir = %dir, name = %entry.name, "not included");
                continue;
            }

            let source = self.root.join(dir.as_path()).join(&entry.name);
            return Ok(Some(CandidateFile::new(source, dir, entry.name)?));
        }
    }
}

impl Iterator for TreeWalk<'_> {
    type Item = StencilResult<CandidateFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(candidate)) => Some(Ok(candidate)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
