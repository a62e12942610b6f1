//! Which variables take part in snapshots.
//!
//! Tracking is configured at two scopes, the local (per shell session) and
//! the global (per user) one. A variable is tracked according to the first of
//! these that has an opinion:
//!
//! 1. explicit track or ignore in the local scope
//! 2. explicit track or ignore in the global scope
//! 3. the local default
//! 4. the global default
//! 5. tracked

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  Local,
  Global,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Scope::Local => "local",
      Scope::Global => "global",
    })
  }
}

/// One scope's tracking rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
  /// `None` defers to the next scope.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<bool>,
  #[serde(default)]
  pub explicit_track: BTreeSet<String>,
  #[serde(default)]
  pub explicit_ignore: BTreeSet<String>,
}

impl TrackingConfig {
  pub fn track(&mut self, name: &str) {
    self.explicit_ignore.remove(name);
    self.explicit_track.insert(name.to_string());
  }

  pub fn ignore(&mut self, name: &str) {
    self.explicit_track.remove(name);
    self.explicit_ignore.insert(name.to_string());
  }

  /// Drop any explicit rule for `name`.
  pub fn reset(&mut self, name: &str) {
    self.explicit_track.remove(name);
    self.explicit_ignore.remove(name);
  }

  pub fn set_default(&mut self, default: Option<bool>) {
    self.default = default;
  }

  /// The explicit rule for `name`, if any.
  pub fn explicit(&self, name: &str) -> Option<bool> {
    if self.explicit_track.contains(name) {
      Some(true)
    } else if self.explicit_ignore.contains(name) {
      Some(false)
    } else {
      None
    }
  }
}

/// Where a tracking decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
  Explicit(Scope),
  Default(Scope),
  Fallback,
}

impl fmt::Display for Reason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Reason::Explicit(scope) => write!(f, "explicit {} rule", scope),
      Reason::Default(scope) => write!(f, "{} default", scope),
      Reason::Fallback => f.write_str("built-in default"),
    }
  }
}

/// The local scope layered over the global one.
#[derive(Debug, Clone, Copy)]
pub struct Tracking<'a> {
  local: &'a TrackingConfig,
  global: &'a TrackingConfig,
}

impl<'a> Tracking<'a> {
  pub fn new(local: &'a TrackingConfig, global: &'a TrackingConfig) -> Self {
    Self { local, global }
  }

  pub fn is_tracked(&self, name: &str) -> bool {
    self.decide(name).0
  }

  pub fn decide(&self, name: &str) -> (bool, Reason) {
    if let Some(tracked) = self.local.explicit(name) {
      return (tracked, Reason::Explicit(Scope::Local));
    }
    if let Some(tracked) = self.global.explicit(name) {
      return (tracked, Reason::Explicit(Scope::Global));
    }
    if let Some(tracked) = self.local.default {
      return (tracked, Reason::Default(Scope::Local));
    }
    if let Some(tracked) = self.global.default {
      return (tracked, Reason::Default(Scope::Global));
    }
    (true, Reason::Fallback)
  }
}
