//! Per-variable information: a configured type and a human description.
//!
//! Records live in JSON shards keyed by variable name so that no single file
//! grows with the number of known variables.
//!
//! # Storage Layout
//!
//! ```text
//! {root}/
//! ├── p/
//! │   ├── pa.json     # PATH, PAGER, ...
//! │   └── pw.json     # PWD, ...
//! └── x/
//!     └── x_.json     # X
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config_file::{ConfigFile, ConfigFileError};
use crate::lock::LockMode;
use crate::platform::paths::{descriptions_dir, user_variables_dir};
use crate::vartype::VarType;

/// Source recorded for information the user entered.
pub const SOURCE_LOCAL: &str = "local";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInfo {
  #[serde(rename = "type")]
  pub var_type: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub source: String,
}

impl VarInfo {
  /// The configured type, if it names one envprobe knows.
  pub fn parsed_type(&self) -> Option<VarType> {
    self.var_type.as_deref().and_then(|t| t.parse().ok())
  }

  pub fn is_empty(&self) -> bool {
    self.var_type.is_none() && self.description.is_none()
  }
}

type Shard = BTreeMap<String, VarInfo>;

/// One sharded directory of [`VarInfo`] records.
#[derive(Debug, Clone)]
pub struct VarInfoStore {
  root: PathBuf,
}

impl VarInfoStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn shard_path(&self, name: &str) -> PathBuf {
    let mut key = name.chars().map(|c| {
      if c.is_ascii_alphanumeric() {
        c.to_ascii_lowercase()
      } else {
        '_'
      }
    });
    let first = key.next().unwrap_or('_');
    let second = key.next().unwrap_or('_');

    self
      .root
      .join(first.to_string())
      .join(format!("{}{}.json", first, second))
  }

  pub fn get(&self, name: &str) -> Result<Option<VarInfo>, ConfigFileError> {
    let path = self.shard_path(name);
    if !path.exists() {
      return Ok(None);
    }
    let shard = ConfigFile::<Shard>::open(path, LockMode::Shared)?;
    Ok(shard.get().get(name).cloned())
  }

  /// Store `info`, or drop the record when it carries nothing.
  pub fn set(&self, name: &str, info: VarInfo) -> Result<(), ConfigFileError> {
    let mut shard = ConfigFile::<Shard>::open(self.shard_path(name), LockMode::Exclusive)?;
    let records = shard.get_mut()?;
    if info.is_empty() {
      records.remove(name);
    } else {
      records.insert(name.to_string(), info);
    }
    shard.close()
  }

  /// Returns whether a record existed.
  pub fn remove(&self, name: &str) -> Result<bool, ConfigFileError> {
    let mut shard = ConfigFile::<Shard>::open(self.shard_path(name), LockMode::Exclusive)?;
    if !shard.get().contains_key(name) {
      return Ok(false);
    }
    shard.get_mut()?.remove(name);
    shard.close()?;
    Ok(true)
  }
}

/// Layered lookup: the first store holding a record for a name wins.
#[derive(Debug, Clone)]
pub struct VarInfoLookup {
  stores: Vec<VarInfoStore>,
}

impl VarInfoLookup {
  pub fn new(stores: Vec<VarInfoStore>) -> Self {
    Self { stores }
  }

  /// The user's own records, then the community descriptions.
  pub fn default_lookup() -> Self {
    Self::new(vec![
      VarInfoStore::new(user_variables_dir()),
      VarInfoStore::new(descriptions_dir()),
    ])
  }

  pub fn get(&self, name: &str) -> Result<Option<VarInfo>, ConfigFileError> {
    for store in &self.stores {
      if let Some(info) = store.get(name)? {
        return Ok(Some(info));
      }
    }
    Ok(None)
  }
}
