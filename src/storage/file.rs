//! File backing
//!
//! Loads a collection file and rewrites it atomically.
//!
//! ## Write Protocol
//! 1. Serialize the whole table to YAML
//! 2. Write it to `{file}.tmp` and fsync
//! 3. Rename the tmp file over `{file}`
//! 4. Fsync the directory so the rename survives a crash
//!
//! A failed write removes the tmp file.
//!
//! A reader (or a restarted process) sees either the previous complete file
//! or the new complete file, never a torn one.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// On-disk home of one collection
#[derive(Debug)]
pub struct FileBacking {
    path: PathBuf,
    tmp_path: PathBuf,

    /// Modification time of the file as we last read or wrote it
    known_mtime: Mutex<Option<SystemTime>>,
}

impl FileBacking {
    /// Validate the config and make sure the directory exists
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        Ok(Self {
            path: config.path(),
            tmp_path: config.tmp_path(),
            known_mtime: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Decode every record in the file
    ///
    /// Missing file, empty file and a `null` document all mean "no records".
    pub fn load<M: DeserializeOwned>(&self) -> Result<Vec<M>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        *self.known_mtime.lock() = Self::mtime(&self.path);

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Option<Vec<M>> =
            serde_yaml_ng::from_str(&contents).map_err(|e| StoreError::Decode {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(records.unwrap_or_default())
    }

    /// Replace the file with `records` via tmp + rename
    pub fn persist<M: Serialize>(&self, records: &[M]) -> Result<()> {
        let encoded =
            serde_yaml_ng::to_string(records).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Err(e) = Self::write_synced(&self.tmp_path, encoded.as_bytes()) {
            // A torn staging file must not outlive the failed attempt
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e.into());
        }

        fs::rename(&self.tmp_path, &self.path)?;
        self.sync_parent();
        *self.known_mtime.lock() = Self::mtime(&self.path);

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "persisted collection"
        );
        Ok(())
    }

    /// Detect a modification we did not make ourselves
    ///
    /// Returns the new modification time once per external change.
    pub fn external_change(&self) -> Option<SystemTime> {
        let current = Self::mtime(&self.path)?;
        let mut known = self.known_mtime.lock();
        if *known == Some(current) {
            return None;
        }
        *known = Some(current);
        Some(current)
    }

    fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    /// Make the rename itself durable (best-effort; not every platform can
    /// fsync a directory)
    fn sync_parent(&self) {
        let Some(dir) = self.path.parent() else {
            return;
        };
        if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
            tracing::debug!(dir = %dir.display(), error = %e, "directory fsync skipped");
        }
    }

    fn mtime(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}
