use std::path::PathBuf;
use thiserror::Error;

/// Result type for expansion operations
pub type ExpandResult<T> = Result<T, ExpandError>;

#[derive(Error, Debug)]
pub enum ExpandError {
    /// A recognized internal reference is absent from every search path
    #[error(
        "cannot find `{reference}` included from {}:{line} (searched: {})",
        .included_from.display(),
        display_paths(.searched)
    )]
    NotFound {
        reference: String,
        included_from: PathBuf,
        line: usize,
        searched: Vec<PathBuf>,
    },

    /// A root or resolved source unit could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid include syntax: {0}")]
    InvalidSyntax(String),
}

impl ExpandError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no search paths".to_string();
    }

    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
