use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A throwaway Chrome profile directory, deleted on drop.
///
/// Marketplace sessions never need persisted browser state, so every run
/// gets a fresh profile.
pub struct ScratchProfile {
    path: PathBuf,
}

impl ScratchProfile {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().map_err(|e| Error::Io(e.into()))?;
        let path = temp_dir.keep();

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
