//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stencil_core::application::{ApplicationError, FsErrorKind};
use stencil_core::application::ports::{DirEntry, Filesystem};
use stencil_core::error::{StencilError, StencilResult};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the orchestrator
/// owns another. Writes can be made to fail after a given count to exercise
/// rollback.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
    writes: usize,
    fail_after: Option<usize>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn children(&self, path: &Path) -> Vec<DirEntry> {
        let dirs = self
            .directories
            .iter()
            .filter(|d| d.parent() == Some(path))
            .map(|d| (d, true));
        let files = self
            .files
            .keys()
            .filter(|f| f.parent() == Some(path))
            .map(|f| (f, false));

        let mut entries: Vec<DirEntry> = dirs
            .chain(files)
            .filter_map(|(p, is_dir)| {
                p.file_name().map(|n| DirEntry {
                    name: n.to_string_lossy().into_owned(),
                    is_dir,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

fn failure(kind: FsErrorKind, path: &Path, reason: &str) -> StencilError {
    ApplicationError::Filesystem {
        kind,
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

fn poisoned() -> StencilError {
    StencilError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StencilResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StencilResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }

    /// Seed a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.as_ref().to_vec());
        }
    }

    /// Seed an (empty) directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_dirs(path.as_ref());
        }
    }

    /// Let `n` more writes succeed, then fail every following one.
    pub fn fail_writes_after(&self, n: usize) {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_after = Some(inner.writes + n);
        }
    }

    /// Raw bytes of a file (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// File content as UTF-8 (testing helper).
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.contents(path).and_then(|b| String::from_utf8(b).ok())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path.as_ref()))
            .unwrap_or(false)
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Files under `root`, sorted.
    pub fn files_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.list_files()
            .into_iter()
            .filter(|p| p.starts_with(root))
            .collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(failure(FsErrorKind::AlreadyExists, path, "a file exists at this path"));
        }
        inner.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()> {
        let mut inner = self.write()?;

        if inner.fail_after.is_some_and(|limit| inner.writes >= limit) {
            return Err(failure(FsErrorKind::StorageFull, path, "injected write failure"));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(failure(
                    FsErrorKind::NotFound,
                    path,
                    "Parent directory does not exist",
                ));
            }
        }

        inner.writes += 1;
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StencilResult<Vec<u8>> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| failure(FsErrorKind::NotFound, path, "No such file"))
    }

    fn read_dir(&self, path: &Path) -> StencilResult<Vec<DirEntry>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(failure(FsErrorKind::NotFound, path, "No such directory"));
        }
        Ok(inner.children(path))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> StencilResult<()> {
        let mut inner = self.write()?;
        if !inner.files.contains_key(path) {
            return Err(failure(FsErrorKind::NotFound, path, "No such file"));
        }
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_empty_dir(&self, path: &Path) -> StencilResult<bool> {
        Ok(self.read_dir(path)?.is_empty())
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(failure(FsErrorKind::NotFound, path, "No such directory"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }
}
