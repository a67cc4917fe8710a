//! Snapshot Writer
//!
//! Replaces the store file with a new snapshot.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Writes whole-store snapshots to a fixed path
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    sync: bool,
}

impl SnapshotWriter {
    /// Create a writer for `path`; the temp file sits next to it
    pub fn new(path: &Path, sync: bool) -> Self {
        let mut tmp_name = path.as_os_str().to_os_string();
        tmp_name.push(".tmp");

        Self {
            path: path.to_path_buf(),
            tmp_path: PathBuf::from(tmp_name),
            sync,
        }
    }

    /// Overwrite the store file with `bytes`
    ///
    /// Readers of `path` see either the previous or the new snapshot,
    /// never a partial one. A failed write removes the temp file.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Err(e) = self.replace(bytes) {
            if let Err(cleanup) = fs::remove_file(&self.tmp_path) {
                tracing::trace!(path = %self.tmp_path.display(), error = %cleanup, "temp file not removed");
            }
            return Err(e.into());
        }

        tracing::trace!(path = %self.path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }

    fn replace(&self, bytes: &[u8]) -> io::Result<()> {
        {
            let mut file = File::create(&self.tmp_path)?;
            file.write_all(bytes)?;
            if self.sync {
                file.sync_all()?;
            }
        }

        fs::rename(&self.tmp_path, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }
}
