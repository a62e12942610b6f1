//! Deciding which [`VarType`] a variable has.
//!
//! A [`HeuristicPipeline`] is an ordered stack of [`Heuristic`]s. The most
//! recently pushed one is asked first; the first answer other than
//! [`Resolution::NoOpinion`] wins. [`Resolution::Unmanaged`] is such an answer,
//! so a veto can never be overridden by a lower priority guess.

use std::collections::BTreeMap;

use crate::consts::INTERNAL_VARIABLES;
use crate::varinfo::VarInfoLookup;
use crate::vartype::{EnvVar, Number, VarError, VarType};

/// Raw name to value mapping of an environment.
pub type RawEnv = BTreeMap<String, String>;

/// Configured type meaning "never manage this variable".
pub const IGNORED_TYPE: &str = "ignored";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
  Type(VarType),
  Unmanaged,
  NoOpinion,
}

pub trait Heuristic {
  /// `env` is the environment the variable is looked up in, when known.
  fn resolve(&self, name: &str, env: Option<&RawEnv>) -> Resolution;
}

impl<F> Heuristic for F
where
  F: Fn(&str, Option<&RawEnv>) -> Resolution,
{
  fn resolve(&self, name: &str, env: Option<&RawEnv>) -> Resolution {
    self(name, env)
  }
}

/// Anything is a string.
pub fn string_fallback(_name: &str, _env: Option<&RawEnv>) -> Resolution {
  Resolution::Type(VarType::String)
}

/// Current values that read as numbers.
pub fn numeric_by_value(name: &str, env: Option<&RawEnv>) -> Resolution {
  match env.and_then(|env| env.get(name)) {
    Some(value) if !value.trim().is_empty() && Number::parse(value).is_some() => Resolution::Type(VarType::Numeric),
    _ => Resolution::NoOpinion,
  }
}

/// Process ids and ports.
pub fn numeric_by_name(name: &str, _env: Option<&RawEnv>) -> Resolution {
  if name.ends_with("PID") || name.ends_with("PORT") {
    Resolution::Type(VarType::Numeric)
  } else {
    Resolution::NoOpinion
  }
}

/// `PATH` and every `*_PATH`.
pub fn path_by_name(name: &str, _env: Option<&RawEnv>) -> Resolution {
  if name == "PATH" || name.ends_with("_PATH") {
    Resolution::Type(VarType::Path)
  } else {
    Resolution::NoOpinion
  }
}

/// envprobe's own session bookkeeping and the shell's working directory state.
pub fn internal_veto(name: &str, _env: Option<&RawEnv>) -> Resolution {
  if INTERNAL_VARIABLES.contains(&name) || matches!(name, "PWD" | "OLDPWD" | "SHLVL") {
    Resolution::Unmanaged
  } else {
    Resolution::NoOpinion
  }
}

/// Names starting with `_` are private to whoever set them.
pub fn hidden_veto(name: &str, _env: Option<&RawEnv>) -> Resolution {
  if name.starts_with('_') {
    Resolution::Unmanaged
  } else {
    Resolution::NoOpinion
  }
}

/// Types configured by the user or the community descriptions.
pub struct ConfiguredType {
  lookup: VarInfoLookup,
}

impl ConfiguredType {
  pub fn new(lookup: VarInfoLookup) -> Self {
    Self { lookup }
  }
}

impl Heuristic for ConfiguredType {
  fn resolve(&self, name: &str, _env: Option<&RawEnv>) -> Resolution {
    // An unreadable shard only costs the override.
    let Ok(Some(info)) = self.lookup.get(name) else {
      return Resolution::NoOpinion;
    };
    if info.var_type.as_deref() == Some(IGNORED_TYPE) {
      return Resolution::Unmanaged;
    }
    info.parsed_type().map(Resolution::Type).unwrap_or(Resolution::NoOpinion)
  }
}

#[derive(Default)]
pub struct HeuristicPipeline {
  stack: Vec<Box<dyn Heuristic>>,
}

impl HeuristicPipeline {
  pub fn new() -> Self {
    Self::default()
  }

  /// The standard pipeline, lowest priority first. `lookup` enables the
  /// configured-type override.
  pub fn with_defaults(lookup: Option<VarInfoLookup>) -> Self {
    let mut pipeline = Self::new();
    pipeline.push(string_fallback);
    pipeline.push(numeric_by_value);
    pipeline.push(numeric_by_name);
    pipeline.push(path_by_name);
    if let Some(lookup) = lookup {
      pipeline.push(ConfiguredType::new(lookup));
    }
    pipeline.push(internal_veto);
    pipeline.push(hidden_veto);
    pipeline
  }

  /// Add a heuristic with higher priority than all present ones.
  pub fn push(&mut self, heuristic: impl Heuristic + 'static) {
    self.stack.push(Box::new(heuristic));
  }

  /// `None` when the variable is vetoed or nobody had an opinion.
  pub fn resolve(&self, name: &str, env: Option<&RawEnv>) -> Option<VarType> {
    for heuristic in self.stack.iter().rev() {
      match heuristic.resolve(name, env) {
        Resolution::Type(var_type) => return Some(var_type),
        Resolution::Unmanaged => return None,
        Resolution::NoOpinion => {}
      }
    }
    None
  }

  /// Resolve `name` against `env` and build the variable from `raw`.
  pub fn construct(&self, name: &str, raw: &str, env: Option<&RawEnv>) -> Result<EnvVar, VarError> {
    let var_type = self
      .resolve(name, env)
      .ok_or_else(|| VarError::Unmanaged(name.to_string()))?;
    var_type.construct(name, raw)
  }
}
