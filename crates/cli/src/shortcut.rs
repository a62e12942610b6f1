//! Shortcut syntax for the first command line argument.
//!
//! | shortcut      | expands to                       |
//! | ------------- | -------------------------------- |
//! | `NAME`        | `get NAME`                       |
//! | `?NAME`       | `get --info NAME`                |
//! | `+NAME v..`   | `add --position 0 NAME v..`      |
//! | `NAME+ v..`   | `add --position -1 NAME v..`     |
//! | `-NAME v..`   | `remove NAME v..`                |
//! | `!NAME`       | `undefine NAME`                  |
//! | `NAME=VALUE`  | `set NAME VALUE`                 |
//! | `^NAME`       | `track NAME`                     |
//! | `%`, `%NAME`  | `diff`, `diff NAME`              |
//! | `{SNAP`       | `save SNAP`                      |
//! | `}SNAP`       | `load SNAP`                      |
//!
//! Subcommand names and the global short flags are never rewritten.

use std::fmt;

/// Short flags that must reach the parser unchanged.
const RESERVED_FLAGS: &[&str] = &["-h", "-V", "-v"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortcut {
  Get(String),
  Info(String),
  AddFront(String),
  AddBack(String),
  Remove(String),
  Undefine(String),
  Set(String, String),
  Track(String),
  Diff(Option<String>),
  Save(String),
  Load(String),
}

impl Shortcut {
  pub fn parse(arg: &str) -> Option<Self> {
    if arg == "%" {
      return Some(Shortcut::Diff(None));
    }
    if let Some((name, value)) = arg.split_once('=') {
      return is_variable_name(name).then(|| Shortcut::Set(name.to_string(), value.to_string()));
    }
    if let Some(name) = arg.strip_suffix('+') {
      return is_variable_name(name).then(|| Shortcut::AddBack(name.to_string()));
    }
    if is_variable_name(arg) {
      return Some(Shortcut::Get(arg.to_string()));
    }

    let mut chars = arg.chars();
    let sigil = chars.next()?;
    let rest = chars.as_str();
    match sigil {
      '{' if !rest.is_empty() => return Some(Shortcut::Save(rest.to_string())),
      '}' if !rest.is_empty() => return Some(Shortcut::Load(rest.to_string())),
      _ => {}
    }
    if !is_variable_name(rest) {
      return None;
    }
    let name = rest.to_string();
    match sigil {
      '?' => Some(Shortcut::Info(name)),
      '+' => Some(Shortcut::AddFront(name)),
      '-' => Some(Shortcut::Remove(name)),
      '!' => Some(Shortcut::Undefine(name)),
      '^' => Some(Shortcut::Track(name)),
      '%' => Some(Shortcut::Diff(Some(name))),
      _ => None,
    }
  }

  /// The full subcommand arguments this shortcut stands for.
  pub fn expand(&self) -> Vec<String> {
    let args: Vec<&str> = match self {
      Shortcut::Get(name) => vec!["get", name.as_str()],
      Shortcut::Info(name) => vec!["get", "--info", name.as_str()],
      Shortcut::AddFront(name) => vec!["add", "--position", "0", name.as_str()],
      Shortcut::AddBack(name) => vec!["add", "--position", "-1", name.as_str()],
      Shortcut::Remove(name) => vec!["remove", name.as_str()],
      Shortcut::Undefine(name) => vec!["undefine", name.as_str()],
      Shortcut::Set(name, value) => vec!["set", name.as_str(), value.as_str()],
      Shortcut::Track(name) => vec!["track", name.as_str()],
      Shortcut::Diff(None) => vec!["diff"],
      Shortcut::Diff(Some(name)) => vec!["diff", name.as_str()],
      Shortcut::Save(snapshot) => vec!["save", snapshot.as_str()],
      Shortcut::Load(snapshot) => vec!["load", snapshot.as_str()],
    };
    args.into_iter().map(str::to_string).collect()
  }
}

impl fmt::Display for Shortcut {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Shortcut::Get(name) => write!(f, "{}", name),
      Shortcut::Info(name) => write!(f, "?{}", name),
      Shortcut::AddFront(name) => write!(f, "+{}", name),
      Shortcut::AddBack(name) => write!(f, "{}+", name),
      Shortcut::Remove(name) => write!(f, "-{}", name),
      Shortcut::Undefine(name) => write!(f, "!{}", name),
      Shortcut::Set(name, value) => write!(f, "{}={}", name, value),
      Shortcut::Track(name) => write!(f, "^{}", name),
      Shortcut::Diff(None) => f.write_str("%"),
      Shortcut::Diff(Some(name)) => write!(f, "%{}", name),
      Shortcut::Save(snapshot) => write!(f, "{{{}", snapshot),
      Shortcut::Load(snapshot) => write!(f, "}}{}", snapshot),
    }
  }
}

/// Rewrite `args` (program name first) if its first argument is a shortcut.
///
/// `subcommands` are the words that always keep their meaning.
pub fn expand_args(args: Vec<String>, subcommands: &[&str]) -> Vec<String> {
  let Some(first) = args.get(1) else {
    return args;
  };
  if subcommands.contains(&first.as_str()) || RESERVED_FLAGS.contains(&first.as_str()) {
    return args;
  }
  let Some(shortcut) = Shortcut::parse(first) else {
    return args;
  };

  let mut expanded = Vec::with_capacity(args.len() + 3);
  expanded.push(args[0].clone());
  expanded.extend(shortcut.expand());
  expanded.extend(args.into_iter().skip(2));
  expanded
}

fn is_variable_name(name: &str) -> bool {
  let mut chars = name.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
