use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fanout_core::{format_record, Outcome};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot append to output file {path:?}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Appends one record per call to the output file.
///
/// The file is opened in append mode, written, flushed and synced on every
/// call, so records already written survive a crash later in the run.
/// Existing content is never truncated.
pub struct ResultWriter {
    path: PathBuf,
}

impl ResultWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, original: &str, outcome: &Outcome) -> Result<(), WriteError> {
        let record = format_record(original, outcome);
        self.append_raw(record.as_bytes())
            .map_err(|source| WriteError {
                path: self.path.clone(),
                source,
            })
    }

    fn append_raw(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    }
}
