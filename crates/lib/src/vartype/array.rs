use super::diff::{DiffAction, DiffKind, array_diff, merge_array};
use super::{VarError, Variable};

/// An ordered list of elements joined by a separator character, like `PATH`.
///
/// No element can contain the separator: delimited variables have no escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayVar {
  name: String,
  separator: char,
  value: Vec<String>,
}

impl ArrayVar {
  pub fn parse(name: impl Into<String>, raw: &str, separator: char) -> Self {
    Self {
      name: name.into(),
      separator,
      value: split(raw, separator),
    }
  }

  pub fn separator(&self) -> char {
    self.separator
  }

  pub fn len(&self) -> usize {
    self.value.len()
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_empty()
  }

  /// Insert `elements` in order at `position`.
  ///
  /// `0` is the front, negative positions count from the end with `-1`
  /// meaning after the last element. Out of range positions clamp.
  pub fn insert_at(&mut self, position: isize, elements: Vec<String>) -> Result<(), VarError> {
    self.validate(&elements)?;

    let len = self.value.len() as isize;
    let index = if position < 0 { len + 1 + position } else { position };
    let index = index.clamp(0, len) as usize;

    self.value.splice(index..index, elements);
    Ok(())
  }

  /// Remove every occurrence of `element`. Returns how many were removed.
  pub fn remove_value(&mut self, element: &str) -> usize {
    let before = self.value.len();
    self.value.retain(|e| e != element);
    before - self.value.len()
  }

  pub(crate) fn validate(&self, elements: &[String]) -> Result<(), VarError> {
    match elements.iter().find(|e| e.contains(self.separator)) {
      Some(bad) => Err(VarError::Validation {
        name: self.name.clone(),
        value: bad.clone(),
        separator: self.separator,
      }),
      None => Ok(()),
    }
  }

  /// Apply `actions` after mapping every added value through `canonical`.
  pub(crate) fn apply_diff_with(
    &mut self,
    actions: &[DiffAction],
    canonical: impl Fn(&str) -> String,
  ) -> Result<(), VarError> {
    let mut to_add: Vec<String> = Vec::new();
    for action in actions {
      match action.kind() {
        DiffKind::Removed => {
          self.remove_value(action.value());
        }
        DiffKind::Added => {
          let element = canonical(action.value());
          if !self.value.contains(&element) && !to_add.contains(&element) {
            to_add.push(element);
          }
        }
        DiffKind::Kept => {}
      }
    }

    self.validate(&to_add)?;
    self.value.splice(0..0, to_add);
    Ok(())
  }
}

fn split(raw: &str, separator: char) -> Vec<String> {
  let trimmed = raw.trim_matches(separator);
  if trimmed.is_empty() {
    return Vec::new();
  }
  trimmed.split(separator).map(str::to_string).collect()
}

impl Variable for ArrayVar {
  type Value = Vec<String>;

  fn name(&self) -> &str {
    &self.name
  }

  fn value(&self) -> &Vec<String> {
    &self.value
  }

  fn set_value(&mut self, value: Vec<String>) -> Result<(), VarError> {
    self.validate(&value)?;
    self.value = value;
    Ok(())
  }

  fn raw(&self) -> String {
    let mut buf = [0u8; 4];
    let separator: &str = self.separator.encode_utf8(&mut buf);
    self.value.join(separator).trim_matches(self.separator).to_string()
  }

  fn diff(old: Option<&Self>, new: Option<&Self>) -> Vec<DiffAction> {
    let empty = Vec::new();
    let old = old.map(|v| &v.value).unwrap_or(&empty);
    let new = new.map(|v| &v.value).unwrap_or(&empty);
    array_diff(old, new)
  }

  /// Removed elements are dropped everywhere; added elements that are not
  /// present yet go to the front, in diff order.
  fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError> {
    self.apply_diff_with(actions, str::to_string)
  }

  fn merge_diff(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
    merge_array(first, second)
  }
}
