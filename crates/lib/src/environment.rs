//! Tracking what changed in a shell's environment.
//!
//! An [`Environment`] holds two raw name to value mappings: the *current*
//! environment of the invocation and the *stamped* environment, the last state
//! the shell was known to be in. Stamped state is persisted per session and
//! loaded on first use.
//!
//! Changes flow through three steps:
//!
//! 1. [`Environment::set_variable`] edits the current environment only.
//! 2. [`Environment::apply_change`] records an edit in the stamped environment.
//! 3. [`Environment::save`] writes the stamped environment to disk.
//!
//! [`Environment::diff`] compares the two at any point.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config_file::{ConfigFileError, read_json, write_json_atomic};
use crate::heuristic::{HeuristicPipeline, RawEnv};
use crate::vartype::{DiffAction, DiffKind, EnvVar, VarError, VarType, validate_name};

#[derive(Debug, Error)]
pub enum EnvironmentError {
  #[error(transparent)]
  Var(#[from] VarError),

  #[error("failed to access the saved shell state: {0}")]
  State(#[from] ConfigFileError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
  Added,
  Removed,
  Changed,
}

impl DifferenceKind {
  pub fn as_str(self) -> &'static str {
    match self {
      DifferenceKind::Added => "added",
      DifferenceKind::Removed => "removed",
      DifferenceKind::Changed => "changed",
    }
  }
}

/// How one variable differs between the stamped and the current environment.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDifference {
  pub name: String,
  pub kind: DifferenceKind,
  /// The stamped side, `None` when the variable was not defined.
  pub old: Option<EnvVar>,
  /// The current side, `None` when the variable is no longer defined.
  pub new: Option<EnvVar>,
  pub actions: Vec<DiffAction>,
}

impl VariableDifference {
  pub fn var_type(&self) -> VarType {
    match (&self.new, &self.old) {
      (Some(var), _) | (None, Some(var)) => var.var_type(),
      (None, None) => VarType::String,
    }
  }

  pub fn is_new(&self) -> bool {
    self.kind == DifferenceKind::Added
  }

  pub fn is_unset(&self) -> bool {
    self.kind == DifferenceKind::Removed
  }

  /// A single-valued variable that went from one value to another.
  pub fn is_simple_change(&self) -> bool {
    self.kind == DifferenceKind::Changed && !self.var_type().is_array()
  }

  pub fn of_kind(&self, kind: DiffKind) -> impl Iterator<Item = &DiffAction> {
    self.actions.iter().filter(move |a| a.kind() == kind)
  }
}

pub struct Environment {
  pipeline: HeuristicPipeline,
  current: RawEnv,
  stamped: Option<RawEnv>,
  state_file: Option<PathBuf>,
}

impl Environment {
  /// `state_file` is where the stamped environment persists; without one the
  /// stamped environment starts empty and [`Environment::save`] does nothing.
  pub fn new(pipeline: HeuristicPipeline, current: RawEnv, state_file: Option<PathBuf>) -> Self {
    Self {
      pipeline,
      current,
      stamped: None,
      state_file,
    }
  }

  /// The environment of this process. Variables that are not valid Unicode are
  /// skipped.
  pub fn from_process(pipeline: HeuristicPipeline, state_file: Option<PathBuf>) -> Self {
    let current = std::env::vars_os()
      .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
      .collect();
    Self::new(pipeline, current, state_file)
  }

  pub fn current_environment(&self) -> &RawEnv {
    &self.current
  }

  pub fn stamped_environment(&mut self) -> Result<&RawEnv, EnvironmentError> {
    self.stamped_mut().map(|stamped| &*stamped)
  }

  fn stamped_mut(&mut self) -> Result<&mut RawEnv, EnvironmentError> {
    if self.stamped.is_none() {
      self.stamped = Some(match &self.state_file {
        Some(path) => load_state(path)?,
        None => RawEnv::new(),
      });
    }
    Ok(self.stamped.get_or_insert_with(RawEnv::new))
  }

  /// Take the current environment as the new baseline. Nothing is written.
  pub fn stamp(&mut self) {
    self.stamped = Some(self.current.clone());
  }

  /// Persist the stamped environment, loading it first if needed.
  pub fn save(&mut self) -> Result<(), EnvironmentError> {
    let Some(path) = self.state_file.clone() else {
      return Ok(());
    };
    let stamped = self.stamped_environment()?;
    write_json_atomic(&path, stamped)?;
    restrict_to_owner(&path)?;
    debug!(path = %path.display(), variables = stamped.len(), "saved stamped environment");
    Ok(())
  }

  /// The variable as currently defined, and whether it is defined at all.
  pub fn get(&self, name: &str) -> Result<(EnvVar, bool), VarError> {
    validate_name(name)?;
    let raw = self.current.get(name);
    let var = self
      .pipeline
      .construct(name, raw.map(String::as_str).unwrap_or(""), Some(&self.current))?;
    Ok((var, raw.is_some()))
  }

  /// The variable as stamped, typed the same way as [`Environment::get`].
  pub fn get_stamped_variable(&mut self, name: &str) -> Result<(EnvVar, bool), EnvironmentError> {
    let var_type = self.resolve(name)?;
    let stamped = self.stamped_environment()?;
    let raw = stamped.get(name);
    let var = var_type.construct(name, raw.map(String::as_str).unwrap_or(""))?;
    Ok((var, raw.is_some()))
  }

  /// Write `var` into the current environment, or remove it.
  pub fn set_variable(&mut self, var: &EnvVar, remove: bool) {
    if remove {
      self.current.remove(var.name());
    } else {
      self.current.insert(var.name().to_string(), var.raw());
    }
  }

  /// Write `var` into the stamped environment, or remove it.
  pub fn apply_change(&mut self, var: &EnvVar, remove: bool) -> Result<(), EnvironmentError> {
    let stamped = self.stamped_mut()?;
    if remove {
      stamped.remove(var.name());
    } else {
      stamped.insert(var.name().to_string(), var.raw());
    }
    Ok(())
  }

  /// Every managed variable whose value differs between stamped and current.
  ///
  /// Names the pipeline refuses to manage, and names a shell cannot assign,
  /// are skipped.
  pub fn diff(&mut self) -> Result<BTreeMap<String, VariableDifference>, EnvironmentError> {
    let stamped = self.stamped_environment()?.clone();
    let names: BTreeSet<&String> = stamped.keys().chain(self.current.keys()).collect();

    let mut differences = BTreeMap::new();
    for name in names {
      let old_raw = stamped.get(name).map(String::as_str);
      let new_raw = self.current.get(name).map(String::as_str);
      if old_raw == new_raw || validate_name(name).is_err() {
        continue;
      }
      let env = if new_raw.is_some() { &self.current } else { &stamped };
      let Some(var_type) = self.pipeline.resolve(name, Some(env)) else {
        continue;
      };
      if let Some(difference) = variable_difference(name, var_type, old_raw, new_raw)? {
        differences.insert(name.clone(), difference);
      }
    }
    Ok(differences)
  }

  /// Type of `name` judged by whichever environment defines it, current first.
  fn resolve(&mut self, name: &str) -> Result<VarType, EnvironmentError> {
    if self.current.contains_key(name) {
      return self
        .pipeline
        .resolve(name, Some(&self.current))
        .ok_or_else(|| VarError::Unmanaged(name.to_string()).into());
    }
    let stamped = self.stamped_environment()?.clone();
    self
      .pipeline
      .resolve(name, Some(&stamped))
      .ok_or_else(|| VarError::Unmanaged(name.to_string()).into())
  }
}

/// Build the difference of one variable, `None` when the values are
/// semantically equal.
///
/// A side that does not parse as `var_type` makes both sides plain strings.
fn variable_difference(
  name: &str,
  var_type: VarType,
  old_raw: Option<&str>,
  new_raw: Option<&str>,
) -> Result<Option<VariableDifference>, VarError> {
  let construct = |t: VarType, raw: Option<&str>| raw.map(|raw| t.construct(name, raw)).transpose();
  let (old, new) = match (construct(var_type, old_raw), construct(var_type, new_raw)) {
    (Ok(old), Ok(new)) => (old, new),
    _ => (
      construct(VarType::String, old_raw)?,
      construct(VarType::String, new_raw)?,
    ),
  };

  let kind = match (&old, &new) {
    (None, Some(_)) => DifferenceKind::Added,
    (Some(_), None) => DifferenceKind::Removed,
    (Some(o), Some(n)) if o.same_value(n) => return Ok(None),
    (Some(_), Some(_)) => DifferenceKind::Changed,
    (None, None) => return Ok(None),
  };
  let actions = EnvVar::diff(old.as_ref(), new.as_ref())?;
  // Only duplicates moved around.
  if kind == DifferenceKind::Changed && actions.is_empty() {
    return Ok(None);
  }

  Ok(Some(VariableDifference {
    name: name.to_string(),
    kind,
    old,
    new,
    actions,
  }))
}

fn load_state(path: &Path) -> Result<RawEnv, ConfigFileError> {
  let state: RawEnv = read_json(path)?;
  debug!(path = %path.display(), variables = state.len(), "loaded stamped environment");
  Ok(state)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<(), ConfigFileError> {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|source| ConfigFileError::Write {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<(), ConfigFileError> {
  Ok(())
}
