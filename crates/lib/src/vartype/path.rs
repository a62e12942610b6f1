use std::path::Path;

use super::array::ArrayVar;
use super::diff::{DiffAction, merge_array};
use super::{VarError, Variable};

/// A colon separated list of directories, like `PATH` or `LD_LIBRARY_PATH`.
///
/// Relative elements are made absolute against the current working directory
/// when set. Symlinks are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathVar {
  inner: ArrayVar,
}

pub const PATH_SEPARATOR: char = ':';

impl PathVar {
  pub fn parse(name: impl Into<String>, raw: &str) -> Result<Self, VarError> {
    let mut inner = ArrayVar::parse(name, raw, PATH_SEPARATOR);
    let absolute = inner.value().iter().map(|e| absolutize(e)).collect();
    inner.set_value(absolute)?;
    Ok(Self { inner })
  }

  pub fn insert_at(&mut self, position: isize, elements: Vec<String>) -> Result<(), VarError> {
    let elements = elements.iter().map(|e| absolutize(e)).collect();
    self.inner.insert_at(position, elements)
  }

  /// Remove every occurrence of `element`, compared after making it absolute.
  pub fn remove_value(&mut self, element: &str) -> usize {
    self.inner.remove_value(&absolutize(element))
  }
}

/// Absolute form of one element. Empty elements stay empty.
fn absolutize(element: &str) -> String {
  if element.is_empty() {
    return String::new();
  }
  match std::path::absolute(Path::new(element)) {
    Ok(path) => dunce::simplified(&path).to_string_lossy().into_owned(),
    Err(_) => element.to_string(),
  }
}

impl Variable for PathVar {
  type Value = Vec<String>;

  fn name(&self) -> &str {
    self.inner.name()
  }

  fn value(&self) -> &Vec<String> {
    self.inner.value()
  }

  fn set_value(&mut self, value: Vec<String>) -> Result<(), VarError> {
    self.inner.set_value(value.iter().map(|e| absolutize(e)).collect())
  }

  fn raw(&self) -> String {
    self.inner.raw()
  }

  fn diff(old: Option<&Self>, new: Option<&Self>) -> Vec<DiffAction> {
    ArrayVar::diff(old.map(|v| &v.inner), new.map(|v| &v.inner))
  }

  fn apply_diff(&mut self, actions: &[DiffAction]) -> Result<(), VarError> {
    self.inner.apply_diff_with(actions, absolutize)
  }

  fn merge_diff(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
    merge_array(first, second)
  }
}
