use anyhow::Result;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use envprobe_lib::environment::{DifferenceKind, VariableDifference};
use envprobe_lib::vartype::{DiffAction, DiffKind};

use super::{TrackingConfigs, current_session, environment, select_differences};
use crate::output::{OutputFormat, print_action, print_info, print_json, print_warning, symbols};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DiffFormat {
  /// One block per variable with its added and removed elements.
  #[default]
  Normal,
  /// `---`/`+++` headers like `diff -u`.
  Unified,
}

#[derive(Serialize)]
struct DiffEntry<'a> {
  name: &'a str,
  kind: &'static str,
  #[serde(rename = "type")]
  var_type: &'static str,
  old: Option<String>,
  new: Option<String>,
  actions: &'a [DiffAction],
}

/// Show what changed since the shell's last stamp.
pub fn cmd_diff(names: &[String], format: DiffFormat, output: OutputFormat) -> Result<()> {
  let session = current_session();
  if session.is_none() {
    print_warning("this shell is not hooked; every variable counts as new");
  }
  let mut env = environment(session.as_ref());
  let configs = TrackingConfigs::load(session.as_ref())?;
  let differences = select_differences(env.diff()?, names, &configs.tracking());

  if output.is_json() {
    let entries: Vec<DiffEntry<'_>> = differences
      .iter()
      .map(|d| DiffEntry {
        name: &d.name,
        kind: d.kind.as_str(),
        var_type: d.var_type().as_str(),
        old: d.old.as_ref().map(|v| v.raw()),
        new: d.new.as_ref().map(|v| v.raw()),
        actions: &d.actions,
      })
      .collect();
    return print_json(&entries);
  }

  if differences.is_empty() {
    print_info("No changes");
    return Ok(());
  }

  for difference in &differences {
    match format {
      DiffFormat::Normal => print_normal(difference),
      DiffFormat::Unified => print_unified(difference),
    }
  }
  Ok(())
}

fn print_normal(difference: &VariableDifference) {
  let symbol = match difference.kind {
    DifferenceKind::Added => symbols::ADD.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    DifferenceKind::Removed => symbols::REMOVE.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
    DifferenceKind::Changed => symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
  };
  println!(
    "{} {} ({})",
    symbol,
    difference.name.if_supports_color(Stream::Stdout, |s| s.bold()),
    difference.var_type()
  );
  for kind in [DiffKind::Added, DiffKind::Removed] {
    for action in difference.of_kind(kind) {
      print_action("    ", kind, action.value());
    }
  }
}

fn print_unified(difference: &VariableDifference) {
  println!("--- {} (stamped)", difference.name);
  println!("+++ {} (current)", difference.name);
  for kind in [DiffKind::Removed, DiffKind::Added, DiffKind::Kept] {
    for action in difference.of_kind(kind) {
      print_action("", kind, action.value());
    }
  }
}
