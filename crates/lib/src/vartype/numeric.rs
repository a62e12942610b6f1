use std::fmt;

use super::diff::{DiffAction, merge_scalar, scalar_added, scalar_diff};
use super::{VarError, Variable};

/// A number that is an integer whenever it can be represented exactly as one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
  Int(i64),
  Float(f64),
}

impl Number {
  /// `None` for text that is not a finite number.
  pub fn parse(text: &str) -> Option<Self> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
      return Some(Number::Int(int));
    }

    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
      Some(Number::Int(float as i64))
    } else {
      Some(Number::Float(float))
    }
  }
}

impl fmt::Display for Number {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Number::Int(i) => write!(f, "{}", i),
      Number::Float(x) => write!(f, "{}", x),
    }
  }
}

/// A numeric variable. An empty raw value holds no number.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericVar {
  name: String,
  value: Option<Number>,
}

impl NumericVar {
  pub fn parse(name: impl Into<String>, raw: &str) -> Result<Self, VarError> {
    let name = name.into();
    let value = parse_value(&name, raw)?;
    Ok(Self { name, value })
  }
}

fn parse_value(name: &str, raw: &str) -> Result<Option<Number>, VarError> {
  if raw.is_empty() {
    return Ok(None);
  }
  Number::parse(raw).map(Some).ok_or_else(|| VarError::Parse {
    name: name.to_string(),
    value: raw.to_string(),
  })
}

impl Variable for NumericVar {
  type Value = Option<Number>;

  fn name(&self) -> &str {
    &self.name
  }

  fn value(&self) -> &Option<Number> {
    &self.value
  }

  fn set_value(&mut self, value: Option<Number>) -> Result<(), VarError> {
    // Re-parse so integral floats collapse to integers.
    self.value = match value {
      Some(number) => Number::parse(&number.to_string()),
      None => None,
    };
    Ok(())
  }

  fn raw(&self) -> String {
    self.value.map(|n| n.to_string()).unwrap_or_default()
  }

  fn diff(old: Option<&Self>, new: Option<&Self>) -> Vec<DiffAction> {
    let old_value = old.and_then(|v| v.value);
    let new_value = new.and_then(|v| v.value);
    let old_raw = old.map(Self::raw).unwrap_or_default();
    let new_raw = new.map(Self::raw).unwrap_or_default();
    scalar_diff(&old_raw, &new_raw, old_value == new_value)
  }

  fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError> {
    if let Some(raw) = scalar_added(actions) {
      self.value = parse_value(&self.name, raw)?;
    }
    Ok(())
  }

  fn merge_diff(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
    merge_scalar(first, second)
  }
}
