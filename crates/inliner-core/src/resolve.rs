//! Reference resolution against an ordered list of search directories

use crate::error::{ExpandError, ExpandResult};
use std::path::{Path, PathBuf};

/// Ordered search directories; the first directory containing the
/// reference wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new<P: AsRef<Path>>(dirs: impl IntoIterator<Item = P>) -> Self {
        Self {
            dirs: dirs.into_iter().map(|d| d.as_ref().to_path_buf()).collect(),
        }
    }

    pub fn push<P: AsRef<Path>>(&mut self, dir: P) {
        self.dirs.push(dir.as_ref().to_path_buf());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Every path that would be probed for `reference`, in order
    pub fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        self.dirs.iter().map(|dir| dir.join(reference)).collect()
    }

    /// First existing regular file for `reference`
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(reference))
            .find(|candidate| candidate.is_file())
    }
}

/// Identity of a source unit for deduplication
pub fn identity(path: &Path) -> ExpandResult<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| ExpandError::unreadable(path, e))
}
