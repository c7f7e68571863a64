use super::preferences::PreferenceMemory;
use crate::error::MemoryError;
use crate::utils::fs::write_atomic;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Single-profile preference document on disk.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means no preferences yet, not an error.
    pub fn load(&self) -> std::result::Result<PreferenceMemory, MemoryError> {
        if !self.path.exists() {
            return Ok(PreferenceMemory::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| MemoryError::Read(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| MemoryError::Parse(format!("{}: {e}", self.path.display())))
    }

    /// Replace the whole document.
    pub fn save(&self, memory: &PreferenceMemory) -> Result<()> {
        let content = serde_json::to_string_pretty(memory)?;
        write_atomic(&self.path, &content)
    }

    /// Remove the document. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed removing {}", self.path.display()))?;
        Ok(true)
    }
}
