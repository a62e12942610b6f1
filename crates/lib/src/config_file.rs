//! Locked JSON documents on disk.
//!
//! A [`ConfigFile`] holds an advisory lock on a sidecar `<file>.lock` for as long
//! as it lives. The document is loaded on open and written back by
//! [`ConfigFile::close`] only when it was modified. Dropping the handle without
//! closing releases the lock and discards any modification.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::lock::{FileLock, LockError, LockMode};

#[derive(Debug, Error)]
pub enum ConfigFileError {
  #[error(transparent)]
  Lock(#[from] LockError),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{0} was opened read-only")]
  ReadOnly(PathBuf),
}

impl ConfigFileError {
  pub fn is_busy(&self) -> bool {
    matches!(self, ConfigFileError::Lock(err) if err.is_busy())
  }
}

pub struct ConfigFile<T> {
  path: PathBuf,
  mode: LockMode,
  data: T,
  changed: bool,
  _lock: FileLock,
}

impl<T> ConfigFile<T>
where
  T: Serialize + DeserializeOwned + Default,
{
  /// Lock and load `path`. A missing file loads as `T::default()`.
  pub fn open(path: impl Into<PathBuf>, mode: LockMode) -> Result<Self, ConfigFileError> {
    let path = path.into();
    let lock = FileLock::acquire(&lock_path_for(&path), mode, &format!("edit {}", path.display()))?;
    let data = read_json(&path)?;
    debug!(path = %path.display(), ?mode, "opened config file");

    Ok(Self {
      path,
      mode,
      data,
      changed: false,
      _lock: lock,
    })
  }

  pub fn get(&self) -> &T {
    &self.data
  }

  /// Mutable access; marks the document dirty.
  pub fn get_mut(&mut self) -> Result<&mut T, ConfigFileError> {
    if self.mode == LockMode::Shared {
      return Err(ConfigFileError::ReadOnly(self.path.clone()));
    }
    self.changed = true;
    Ok(&mut self.data)
  }

  /// Write back if modified, then release the lock.
  pub fn close(self) -> Result<(), ConfigFileError> {
    if self.changed {
      write_json_atomic(&self.path, &self.data)?;
      debug!(path = %self.path.display(), "wrote config file");
    }
    Ok(())
  }
}

pub(crate) fn lock_path_for(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(OsString::from).unwrap_or_default();
  name.push(".lock");
  path.with_file_name(name)
}

/// Deserialize `path`; a missing file is `T::default()`.
pub(crate) fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigFileError> {
  match fs::read_to_string(path) {
    Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigFileError::Parse {
      path: path.to_path_buf(),
      source,
    }),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
    Err(source) => Err(ConfigFileError::Read {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Write `data` to a temporary sibling, then rename it over `path`.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<(), ConfigFileError> {
  let write_err = |source: io::Error| ConfigFileError::Write {
    path: path.to_path_buf(),
    source,
  };

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir).map_err(write_err)?;

  let content = serde_json::to_string_pretty(data).map_err(|e| write_err(io::Error::other(e)))?;
  let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
  io::Write::write_all(&mut temp, content.as_bytes()).map_err(write_err)?;
  temp.persist(path).map_err(|e| write_err(e.error))?;

  Ok(())
}
