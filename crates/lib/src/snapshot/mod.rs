//! Named snapshots of variable changes.
//!
//! A [`Snapshot`] records, per variable, what loading it should do: set a
//! value, apply a diff or undefine the variable. Saving into an existing
//! snapshot merges with what is already recorded, so repeated partial saves
//! accumulate.
//!
//! On disk a snapshot is a JSON document:
//!
//! ```json
//! {
//!   "variables": {
//!     "EDITOR": "vim",
//!     "PATH": [["+", "/opt/bin"], ["-", "/old/bin"]]
//!   },
//!   "unset": ["PAGER"]
//! }
//! ```

mod storage;

use std::collections::{BTreeMap, BTreeSet};
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config_file::ConfigFileError;
use crate::environment::VariableDifference;
use crate::vartype::{DiffAction, EnvVar, VarError, VarType};

pub use storage::SnapshotStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
  #[error("snapshot '{0}' does not exist")]
  NotFound(String),

  #[error("invalid snapshot name '{0}'")]
  InvalidName(String),

  #[error(transparent)]
  Busy(ConfigFileError),

  #[error(transparent)]
  File(ConfigFileError),

  #[error("failed to delete snapshot '{name}': {source}")]
  Delete {
    name: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to list snapshots: {0}")]
  List(#[from] walkdir::Error),

  #[error(transparent)]
  Var(#[from] VarError),
}

impl From<ConfigFileError> for SnapshotError {
  fn from(err: ConfigFileError) -> Self {
    if err.is_busy() {
      SnapshotError::Busy(err)
    } else {
      SnapshotError::File(err)
    }
  }
}

/// What loading a snapshot does to one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
  Value(String),
  Diff(Vec<DiffAction>),
  Undefine,
}

impl Instruction {
  /// Apply to `var`. Returns whether the variable stays defined.
  ///
  /// A recorded value that does not parse as the type of `var` turns it into a
  /// plain string, the same way differences are taken.
  pub fn apply_to(&self, var: &mut EnvVar) -> Result<bool, VarError> {
    match self {
      Instruction::Value(raw) => {
        if var.set_raw(raw).is_err() {
          *var = VarType::String.construct(var.name(), raw)?;
        }
      }
      Instruction::Diff(actions) => var.apply_diff(actions)?,
      Instruction::Undefine => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Recorded {
  Value(String),
  Diff(Vec<DiffAction>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  variables: BTreeMap<String, Recorded>,
  #[serde(default)]
  unset: BTreeSet<String>,
}

impl Snapshot {
  pub fn get(&self, name: &str) -> Option<Instruction> {
    if self.unset.contains(name) {
      return Some(Instruction::Undefine);
    }
    self.variables.get(name).map(|recorded| match recorded {
      Recorded::Value(raw) => Instruction::Value(raw.clone()),
      Recorded::Diff(actions) => Instruction::Diff(actions.clone()),
    })
  }

  /// Overwrite the record of `name`.
  pub fn set(&mut self, name: &str, instruction: Instruction) {
    let recorded = match instruction {
      Instruction::Value(raw) => Recorded::Value(raw),
      Instruction::Diff(actions) => Recorded::Diff(actions),
      Instruction::Undefine => return self.undefine(name),
    };
    self.unset.remove(name);
    self.variables.insert(name.to_string(), recorded);
  }

  /// Mark `name` to be undefined on load.
  pub fn undefine(&mut self, name: &str) {
    self.variables.remove(name);
    self.unset.insert(name.to_string());
  }

  /// Forget `name` entirely. Returns whether there was a record.
  pub fn remove(&mut self, name: &str) -> bool {
    let had_value = self.variables.remove(name).is_some();
    self.unset.remove(name) || had_value
  }

  pub fn keys(&self) -> BTreeSet<&str> {
    self
      .variables
      .keys()
      .chain(self.unset.iter())
      .map(String::as_str)
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty() && self.unset.is_empty()
  }

  /// Fold an observed change into the record of its variable.
  ///
  /// New variables and changes of single-valued variables store the final
  /// value, unset variables are marked for undefine. Changes of arrays merge
  /// with an already recorded diff or are applied onto a recorded value.
  pub fn record_difference(&mut self, difference: &VariableDifference) -> Result<(), VarError> {
    let name = difference.name.as_str();
    if difference.is_unset() {
      self.undefine(name);
      return Ok(());
    }
    if difference.is_new() || difference.is_simple_change() {
      let raw = difference.new.as_ref().map(EnvVar::raw).unwrap_or_default();
      self.set(name, Instruction::Value(raw));
      return Ok(());
    }

    let var_type = difference.var_type();
    let instruction = match self.get(name) {
      Some(Instruction::Diff(recorded)) => Instruction::Diff(var_type.merge_diff(&recorded, &difference.actions)),
      Some(Instruction::Value(raw)) => {
        let mut var = var_type.construct(name, &raw)?;
        var.apply_diff(&difference.actions)?;
        Instruction::Value(var.raw())
      }
      Some(Instruction::Undefine) | None => Instruction::Diff(difference.actions.clone()),
    };
    self.set(name, instruction);
    Ok(())
  }
}
