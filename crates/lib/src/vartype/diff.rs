//! Structural differences between two values of one variable type.
//!
//! A diff is an ordered list of [`DiffAction`]s. On disk each action is a
//! `[tag, value]` pair with the tags `+`, `-` and `=`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffKind {
  #[serde(rename = "+")]
  Added,
  #[serde(rename = "-")]
  Removed,
  #[serde(rename = "=")]
  Kept,
}

impl DiffKind {
  pub fn symbol(self) -> &'static str {
    match self {
      DiffKind::Added => "+",
      DiffKind::Removed => "-",
      DiffKind::Kept => "=",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffAction(pub DiffKind, pub String);

impl DiffAction {
  pub fn added(value: impl Into<String>) -> Self {
    Self(DiffKind::Added, value.into())
  }

  pub fn removed(value: impl Into<String>) -> Self {
    Self(DiffKind::Removed, value.into())
  }

  pub fn kept(value: impl Into<String>) -> Self {
    Self(DiffKind::Kept, value.into())
  }

  pub fn kind(&self) -> DiffKind {
    self.0
  }

  pub fn value(&self) -> &str {
    &self.1
  }
}

impl fmt::Display for DiffAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.0.symbol(), self.1)
  }
}

pub fn has_added(actions: &[DiffAction]) -> bool {
  actions.iter().any(|a| a.kind() == DiffKind::Added)
}

/// Diff of two single-valued variables given as raw text, `""` meaning empty.
///
/// `equal` is the semantic comparison, which may be looser than comparing
/// the raw text.
pub(crate) fn scalar_diff(old_raw: &str, new_raw: &str, equal: bool) -> Vec<DiffAction> {
  if equal {
    return Vec::new();
  }

  let mut actions = Vec::with_capacity(2);
  if !old_raw.is_empty() {
    actions.push(DiffAction::removed(old_raw));
  }
  if !new_raw.is_empty() {
    actions.push(DiffAction::added(new_raw));
  }
  actions
}

/// The added value of a single-valued diff, if any. The last one wins.
pub(crate) fn scalar_added(actions: &[DiffAction]) -> Option<&str> {
  actions
    .iter()
    .rev()
    .find(|a| a.kind() == DiffKind::Added)
    .map(DiffAction::value)
}

/// First `first`, then `second`: the later added value is the final state.
pub(crate) fn merge_scalar(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
  if has_added(second) {
    second.to_vec()
  } else if has_added(first) {
    first.to_vec()
  } else if !second.is_empty() {
    second.to_vec()
  } else {
    first.to_vec()
  }
}

/// Keeps the first occurrence of every element.
pub(crate) fn dedup<S: AsRef<str>>(elements: &[S]) -> Vec<&str> {
  let mut seen = HashSet::new();
  elements
    .iter()
    .map(|e| e.as_ref())
    .filter(|e| seen.insert(*e))
    .collect()
}

/// Element-wise diff of two sequences.
///
/// Emits added elements in `new` order, then removed elements in `old` order,
/// then the elements both share in the order of `old` followed by `new`.
/// Empty elements are never reported as added or removed.
pub(crate) fn array_diff<S: AsRef<str>>(old: &[S], new: &[S]) -> Vec<DiffAction> {
  let old = dedup(old);
  let new = dedup(new);
  if old == new {
    return Vec::new();
  }

  let old_set: HashSet<&str> = old.iter().copied().collect();
  let new_set: HashSet<&str> = new.iter().copied().collect();

  let added = new
    .iter()
    .filter(|e| !e.is_empty() && !old_set.contains(*e))
    .map(|e| DiffAction::added(*e));
  let removed = old
    .iter()
    .filter(|e| !e.is_empty() && !new_set.contains(*e))
    .map(|e| DiffAction::removed(*e));

  let both: Vec<&str> = old.iter().chain(new.iter()).copied().collect();
  let kept = dedup(&both)
    .into_iter()
    .filter(|e| old_set.contains(e) && new_set.contains(e))
    .map(DiffAction::kept);

  added.chain(removed).chain(kept).collect()
}

/// First `first`, then `second`, element by element.
///
/// The later add or remove of an element overrides the earlier one; a kept
/// record never overrides an add or remove. The result is grouped like
/// [`array_diff`] output, each group in first-seen order.
pub(crate) fn merge_array(first: &[DiffAction], second: &[DiffAction]) -> Vec<DiffAction> {
  let mut order: Vec<&str> = Vec::new();
  let mut intent: HashMap<&str, DiffKind> = HashMap::new();

  for action in first.iter().chain(second) {
    match intent.get(action.value()) {
      None => {
        order.push(action.value());
        intent.insert(action.value(), action.kind());
      }
      Some(_) if action.kind() == DiffKind::Kept => {}
      Some(_) => {
        intent.insert(action.value(), action.kind());
      }
    }
  }

  let (order, intent) = (&order, &intent);
  let group = move |kind: DiffKind| {
    order
      .iter()
      .filter(move |e| intent[**e] == kind)
      .map(move |e| DiffAction(kind, (*e).to_string()))
  };

  group(DiffKind::Added)
    .chain(group(DiffKind::Removed))
    .chain(group(DiffKind::Kept))
    .collect()
}
