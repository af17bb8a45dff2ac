//! JSON file store.
//!
//! `contexts.json` holds the ordered list of contexts. Saves go through a temp file
//! in the same directory that is renamed over the target, so a crash never leaves
//! a half-written file. Loading never fails on content: legacy files are migrated
//! and re-saved, undecodable files are moved aside and an empty list is returned.

use super::{legacy, ContextStore};
use crate::context::Context;
use crate::error::StorageError;
use chrono::Utc;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const CONTEXTS_FILE_NAME: &str = "contexts.json";

pub struct JsonContextStore {
    path: PathBuf,
}

impl JsonContextStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at the per-user default location.
    pub fn at_default_location() -> Result<Self, StorageError> {
        let dir = crate::config::paths::data_dir().ok_or_else(|| {
            StorageError::NoLocation("could not determine the user data directory".to_string())
        })?;
        Ok(Self::new(dir.join(CONTEXTS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let name = format!("{}.corrupt-{}", CONTEXTS_FILE_NAME, stamp);
        match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Move an undecodable file out of the way so the next save does not destroy it.
    fn back_up_unreadable(&self, error: &dyn std::fmt::Display) {
        let backup = self.backup_path();
        match std::fs::rename(&self.path, &backup) {
            Ok(()) => warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                error = %error,
                "Contexts file could not be decoded; moved aside and starting empty"
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Contexts file could not be decoded and could not be backed up"
            ),
        }
    }

    fn decode(&self, raw: &str) -> Result<Vec<Context>, StorageError> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                self.back_up_unreadable(&e);
                return Ok(Vec::new());
            }
        };

        let error = match serde_json::from_value::<Vec<Context>>(value.clone()) {
            Ok(contexts) => return Ok(contexts),
            Err(e) => e,
        };

        if let Some(contexts) = legacy::migrate(&value) {
            info!(
                path = %self.path.display(),
                contexts = contexts.len(),
                "Migrated contexts file to the current schema"
            );
            self.save_all(&contexts)?;
            return Ok(contexts);
        }

        self.back_up_unreadable(&error);
        Ok(Vec::new())
    }
}

impl ContextStore for JsonContextStore {
    fn load_all(&self) -> Result<Vec<Context>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No contexts file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.decode(&raw)
    }

    fn save_all(&self, contexts: &[Context]) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let encoded = serde_json::to_vec_pretty(contexts)?;
        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(&encoded)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| StorageError::IoError(e.error))?;
        debug!(path = %self.path.display(), contexts = contexts.len(), "Saved contexts");
        Ok(())
    }
}
