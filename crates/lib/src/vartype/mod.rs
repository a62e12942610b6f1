//! Typed environment variables.
//!
//! Every environment variable is plain text to the operating system. envprobe
//! interprets it as one of a closed set of types so that values can be
//! edited and compared structurally:
//!
//! - [`StringVar`]: arbitrary text
//! - [`NumericVar`]: an integer or floating point number
//! - [`ArrayVar`]: elements joined by `:` or `;`
//! - [`PathVar`]: a `:` separated list of absolute directories
//!
//! [`EnvVar`] wraps one of them; [`VarType`] names them.

mod array;
pub mod diff;
mod numeric;
mod path;
mod string;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use array::ArrayVar;
pub use diff::{DiffAction, DiffKind};
pub use numeric::{Number, NumericVar};
pub use path::{PATH_SEPARATOR, PathVar};
pub use string::StringVar;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VarError {
  #[error("cannot use {value:?} in {name}: elements must not contain the separator {separator:?}")]
  Validation { name: String, value: String, separator: char },

  #[error("{name} is numeric, but {value:?} is not a number")]
  Parse { name: String, value: String },

  #[error("{0} is not managed by envprobe")]
  Unmanaged(String),

  #[error("cannot compare {name} as both {left} and {right}")]
  TypeMismatch { name: String, left: VarType, right: VarType },

  #[error("{name} is a {var_type} variable, not an array")]
  NotAnArray { name: String, var_type: VarType },

  #[error("unknown variable type {0:?}")]
  UnknownType(String),

  #[error("{0:?} is not a valid variable name")]
  InvalidName(String),
}

/// Accept only names a POSIX shell can assign: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Names end up verbatim in statements the shell evaluates.
pub fn validate_name(name: &str) -> Result<(), VarError> {
  let mut chars = name.chars();
  let valid = chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid {
    Ok(())
  } else {
    Err(VarError::InvalidName(name.to_string()))
  }
}

/// Capabilities every variable type provides.
pub trait Variable {
  /// The structured value.
  type Value;

  fn name(&self) -> &str;

  fn value(&self) -> &Self::Value;

  fn set_value(&mut self, value: Self::Value) -> Result<(), VarError>;

  /// Canonical text form, as the shell should see it.
  fn raw(&self) -> String;

  /// Actions turning `old` into `new`. `None` is an undefined variable.
  fn diff(old: Option<&Self>, new: Option<&Self>) -> Vec<DiffAction>
  where
    Self: Sized;

  fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError>;

  /// One diff meaning "apply `first`, then `second`".
  fn merge_diff(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction>
  where
    Self: Sized;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
  String,
  Numeric,
  ColonSeparated,
  SemicolonSeparated,
  Path,
}

impl VarType {
  pub const ALL: [VarType; 5] = [
    VarType::String,
    VarType::Numeric,
    VarType::ColonSeparated,
    VarType::SemicolonSeparated,
    VarType::Path,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      VarType::String => "string",
      VarType::Numeric => "numeric",
      VarType::ColonSeparated => "colon_separated",
      VarType::SemicolonSeparated => "semi_separated",
      VarType::Path => "path",
    }
  }

  pub fn is_array(self) -> bool {
    matches!(
      self,
      VarType::ColonSeparated | VarType::SemicolonSeparated | VarType::Path
    )
  }

  /// Build a variable of this type from raw text.
  pub fn construct(self, name: &str, raw: &str) -> Result<EnvVar, VarError> {
    Ok(match self {
      VarType::String => EnvVar::String(StringVar::new(name, raw)),
      VarType::Numeric => EnvVar::Numeric(NumericVar::parse(name, raw)?),
      VarType::ColonSeparated => EnvVar::Array(ArrayVar::parse(name, raw, ':')),
      VarType::SemicolonSeparated => EnvVar::Array(ArrayVar::parse(name, raw, ';')),
      VarType::Path => EnvVar::Path(PathVar::parse(name, raw)?),
    })
  }

  pub fn merge_diff(self, first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
    match self {
      VarType::String => StringVar::merge_diff(first, second),
      VarType::Numeric => NumericVar::merge_diff(first, second),
      VarType::ColonSeparated | VarType::SemicolonSeparated => ArrayVar::merge_diff(first, second),
      VarType::Path => PathVar::merge_diff(first, second),
    }
  }
}

impl fmt::Display for VarType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for VarType {
  type Err = VarError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    VarType::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| VarError::UnknownType(s.to_string()))
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvVar {
  String(StringVar),
  Numeric(NumericVar),
  Array(ArrayVar),
  Path(PathVar),
}

impl EnvVar {
  pub fn name(&self) -> &str {
    match self {
      EnvVar::String(v) => v.name(),
      EnvVar::Numeric(v) => v.name(),
      EnvVar::Array(v) => v.name(),
      EnvVar::Path(v) => v.name(),
    }
  }

  pub fn var_type(&self) -> VarType {
    match self {
      EnvVar::String(_) => VarType::String,
      EnvVar::Numeric(_) => VarType::Numeric,
      EnvVar::Array(v) if v.separator() == ';' => VarType::SemicolonSeparated,
      EnvVar::Array(_) => VarType::ColonSeparated,
      EnvVar::Path(_) => VarType::Path,
    }
  }

  pub fn raw(&self) -> String {
    match self {
      EnvVar::String(v) => v.raw(),
      EnvVar::Numeric(v) => v.raw(),
      EnvVar::Array(v) => v.raw(),
      EnvVar::Path(v) => v.raw(),
    }
  }

  /// Elements of an array variable, `None` for single-valued types.
  pub fn elements(&self) -> Option<&[String]> {
    match self {
      EnvVar::Array(v) => Some(v.value()),
      EnvVar::Path(v) => Some(v.value()),
      EnvVar::String(_) | EnvVar::Numeric(_) => None,
    }
  }

  /// Compare structured values, ignoring names.
  pub fn same_value(&self, other: &EnvVar) -> bool {
    match (self, other) {
      (EnvVar::String(a), EnvVar::String(b)) => a.value() == b.value(),
      (EnvVar::Numeric(a), EnvVar::Numeric(b)) => a.value() == b.value(),
      (EnvVar::Array(a), EnvVar::Array(b)) => a.separator() == b.separator() && a.value() == b.value(),
      (EnvVar::Path(a), EnvVar::Path(b)) => a.value() == b.value(),
      _ => false,
    }
  }

  /// Replace the value by parsing `raw` as this variable's type.
  pub fn set_raw(&mut self, raw: &str) -> Result<(), VarError> {
    *self = self.var_type().construct(self.name(), raw)?;
    Ok(())
  }

  pub fn insert_at(&mut self, position: isize, elements: Vec<String>) -> Result<(), VarError> {
    match self {
      EnvVar::Array(v) => v.insert_at(position, elements),
      EnvVar::Path(v) => v.insert_at(position, elements),
      EnvVar::String(_) | EnvVar::Numeric(_) => Err(self.not_an_array()),
    }
  }

  /// Remove every occurrence of `element`. Returns how many were removed.
  pub fn remove_value(&mut self, element: &str) -> Result<usize, VarError> {
    match self {
      EnvVar::Array(v) => Ok(v.remove_value(element)),
      EnvVar::Path(v) => Ok(v.remove_value(element)),
      EnvVar::String(_) | EnvVar::Numeric(_) => Err(self.not_an_array()),
    }
  }

  /// Diff two variables of the same type. `None` is an undefined variable.
  ///
  /// Comparing two different types is a caller bug and reported as
  /// [`VarError::TypeMismatch`].
  pub fn diff(old: Option<&EnvVar>, new: Option<&EnvVar>) -> Result<Vec<DiffAction>, VarError> {
    Ok(match (old, new) {
      (None, None) => Vec::new(),
      (Some(EnvVar::String(o)), None) => StringVar::diff(Some(o), None),
      (None, Some(EnvVar::String(n))) => StringVar::diff(None, Some(n)),
      (Some(EnvVar::String(o)), Some(EnvVar::String(n))) => StringVar::diff(Some(o), Some(n)),
      (Some(EnvVar::Numeric(o)), None) => NumericVar::diff(Some(o), None),
      (None, Some(EnvVar::Numeric(n))) => NumericVar::diff(None, Some(n)),
      (Some(EnvVar::Numeric(o)), Some(EnvVar::Numeric(n))) => NumericVar::diff(Some(o), Some(n)),
      (Some(EnvVar::Array(o)), None) => ArrayVar::diff(Some(o), None),
      (None, Some(EnvVar::Array(n))) => ArrayVar::diff(None, Some(n)),
      (Some(EnvVar::Array(o)), Some(EnvVar::Array(n))) if o.separator() == n.separator() => {
        ArrayVar::diff(Some(o), Some(n))
      }
      (Some(EnvVar::Path(o)), None) => PathVar::diff(Some(o), None),
      (None, Some(EnvVar::Path(n))) => PathVar::diff(None, Some(n)),
      (Some(EnvVar::Path(o)), Some(EnvVar::Path(n))) => PathVar::diff(Some(o), Some(n)),
      (Some(o), Some(n)) => {
        return Err(VarError::TypeMismatch {
          name: o.name().to_string(),
          left: o.var_type(),
          right: n.var_type(),
        });
      }
    })
  }

  pub fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError> {
    match self {
      EnvVar::String(v) => v.apply_diff(actions),
      EnvVar::Numeric(v) => v.apply_diff(actions),
      EnvVar::Array(v) => v.apply_diff(actions),
      EnvVar::Path(v) => v.apply_diff(actions),
    }
  }

  fn not_an_array(&self) -> VarError {
    VarError::NotAnArray {
      name: self.name().to_string(),
      var_type: self.var_type(),
    }
  }
}
