use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid input path: {0}")]
    InvalidInput(String),

    #[error("Duplicate entry name '{name}' (from {first} and {second})")]
    DuplicateEntry {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        ArchiveError::Archive {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the caller misused the tool rather than hitting a runtime failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ArchiveError::InvalidArguments(_)
                | ArchiveError::InvalidInput(_)
                | ArchiveError::DuplicateEntry { .. }
        )
    }
}
