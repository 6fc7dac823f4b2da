use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Content of one planned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedContent {
    Text(String),
    Binary(Vec<u8>),
}

impl PlannedContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// One resolved output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Full destination path.
    pub destination: PathBuf,
    /// Source file relative to its template root, for diagnostics.
    pub origin: PathBuf,
    pub content: PlannedContent,
}

/// Ordered entries for one template root.
///
/// Invariant: destination paths are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyPlan {
    entries: Vec<PlannedEntry>,
    index: HashMap<PathBuf, usize>,
}

impl AssemblyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// [`DomainError::DuplicateDestination`] if another entry already targets
    /// the same path.
    pub fn push(&mut self, entry: PlannedEntry) -> Result<(), DomainError> {
        if let Some(&i) = self.index.get(&entry.destination) {
            return Err(DomainError::DuplicateDestination {
                path: entry.destination,
                first: self.entries[i].origin.clone(),
                second: entry.origin,
            });
        }
        self.index
            .insert(entry.destination.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.destination.clone()).collect()
    }

    pub fn get(&self, destination: &Path) -> Option<&PlannedEntry> {
        self.index.get(destination).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for AssemblyPlan {
    type Item = PlannedEntry;
    type IntoIter = std::vec::IntoIter<PlannedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
