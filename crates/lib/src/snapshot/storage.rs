//! Snapshot storage on disk.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/snapshots/
//! ├── work.json           # snapshot "work"
//! ├── work.json.lock
//! └── project/
//!     └── build.json      # snapshot "project/build"
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config_file::{ConfigFile, lock_path_for};
use crate::lock::LockMode;
use crate::platform::paths::snapshots_dir;

use super::{Snapshot, SnapshotError};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
  base_path: PathBuf,
}

impl SnapshotStore {
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  /// The store in the user's data directory.
  pub fn default_store() -> Self {
    Self::new(snapshots_dir())
  }

  /// Path of the document for `name`, after validating the name.
  pub fn snapshot_path(&self, name: &str) -> Result<PathBuf, SnapshotError> {
    validate_name(name)?;
    Ok(self.base_path.join(format!("{}.{}", name, EXTENSION)))
  }

  pub fn exists(&self, name: &str) -> Result<bool, SnapshotError> {
    Ok(self.snapshot_path(name)?.is_file())
  }

  /// Read a snapshot under a shared lock.
  pub fn load(&self, name: &str) -> Result<Snapshot, SnapshotError> {
    let path = self.snapshot_path(name)?;
    if !path.is_file() {
      return Err(SnapshotError::NotFound(name.to_string()));
    }
    let file = ConfigFile::<Snapshot>::open(path, LockMode::Shared)?;
    Ok(file.get().clone())
  }

  /// Open a snapshot for a read-modify-write cycle. A missing snapshot opens
  /// empty and is created on `close()`.
  pub fn open_for_update(&self, name: &str) -> Result<ConfigFile<Snapshot>, SnapshotError> {
    let path = self.snapshot_path(name)?;
    Ok(ConfigFile::open(path, LockMode::Exclusive)?)
  }

  /// Remove a snapshot entirely, with its lock file and any directories
  /// left empty.
  pub fn delete(&self, name: &str) -> Result<(), SnapshotError> {
    let path = self.snapshot_path(name)?;
    if !path.is_file() {
      return Err(SnapshotError::NotFound(name.to_string()));
    }
    // Held so that no writer recreates the file while it goes away.
    let file = ConfigFile::<Snapshot>::open(&path, LockMode::Exclusive)?;

    match fs::remove_file(&path) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SnapshotError::NotFound(name.to_string())),
      Err(source) => {
        return Err(SnapshotError::Delete {
          name: name.to_string(),
          source,
        });
      }
    }
    drop(file);
    // Already gone if another process deleted it meanwhile.
    let _ = fs::remove_file(lock_path_for(&path));
    self.prune_empty_parents(&path);
    debug!(snapshot = name, "deleted snapshot");
    Ok(())
  }

  fn prune_empty_parents(&self, path: &Path) {
    let mut dir = path.parent();
    while let Some(current) = dir
      && current != self.base_path
      && current.starts_with(&self.base_path)
    {
      // Fails on the first directory that still has entries.
      if fs::remove_dir(current).is_err() {
        break;
      }
      dir = current.parent();
    }
  }

  /// Names of all snapshots, sorted. Nested names use `/`.
  pub fn list(&self) -> Result<Vec<String>, SnapshotError> {
    if !self.base_path.is_dir() {
      return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(&self.base_path).follow_links(false) {
      let entry = entry?;
      let path = entry.path();
      if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        continue;
      }
      let Ok(relative) = path.with_extension("").strip_prefix(&self.base_path).map(Path::to_path_buf) else {
        continue;
      };
      let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
      names.push(parts.join("/"));
    }
    names.sort();
    Ok(names)
  }
}

/// Snapshot names are relative paths without `.`/`..` components or a
/// `.json` suffix of their own.
fn validate_name(name: &str) -> Result<(), SnapshotError> {
  let invalid = || SnapshotError::InvalidName(name.to_string());
  if name.is_empty() || name.ends_with(".json") || name.ends_with('/') || name.contains("//") {
    return Err(invalid());
  }
  let path = Path::new(name);
  if path.components().any(|c| !matches!(c, Component::Normal(_))) {
    return Err(invalid());
  }
  Ok(())
}
