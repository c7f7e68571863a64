use super::types::SessionState;
use crate::error::{SessionError, StudioError};
use crate::utils::fs::write_atomic;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// One JSON artifact per session under a single directory.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    pub fn save(&self, session: &SessionState) -> anyhow::Result<PathBuf> {
        let path = self.path_for(&session.id);
        let content = serde_json::to_string_pretty(session)?;
        write_atomic(&path, &content)
            .with_context(|| format!("failed saving session {}", session.id))?;
        Ok(path)
    }

    pub fn load(&self, session_id: &str) -> crate::error::Result<SessionState> {
        let path = self.path_for(session_id);
        if !path.exists() {
            return Err(SessionError::NotFound(session_id.to_string()).into());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| SessionError::Store(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| {
            StudioError::Session(SessionError::Store(format!("{}: {e}", path.display())))
        })
    }

    /// Saved session ids, newest artifact first. Missing dir yields nothing.
    pub fn list(&self) -> anyhow::Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("failed reading {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            entries.push((modified, stem.to_string()));
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(entries.into_iter().map(|(_, id)| id).collect())
    }
}
