use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file {0:?} does not exist")]
    Missing(PathBuf),
    #[error("failed to read input file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the whole input file up front.
pub fn read_input(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::Missing(path.to_path_buf()),
        _ => InputError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}
