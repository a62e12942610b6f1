use super::diff::{DiffAction, merge_scalar, scalar_added, scalar_diff};
use super::{VarError, Variable};

/// Arbitrary text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringVar {
  name: String,
  value: String,
}

impl StringVar {
  pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: raw.into(),
    }
  }
}

impl Variable for StringVar {
  type Value = String;

  fn name(&self) -> &str {
    &self.name
  }

  fn value(&self) -> &String {
    &self.value
  }

  fn set_value(&mut self, value: String) -> Result<(), VarError> {
    self.value = value;
    Ok(())
  }

  fn raw(&self) -> String {
    self.value.clone()
  }

  fn diff(old: Option<&Self>, new: Option<&Self>) -> Vec<DiffAction> {
    let old = old.map(|v| v.value.as_str()).unwrap_or_default();
    let new = new.map(|v| v.value.as_str()).unwrap_or_default();
    scalar_diff(old, new, old == new)
  }

  fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError> {
    if let Some(value) = scalar_added(actions) {
      self.value = value.to_string();
    }
    Ok(())
  }

  fn merge_diff(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
    merge_scalar(first, second)
  }
}
