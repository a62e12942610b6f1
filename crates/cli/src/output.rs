//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, diff lines, and Unicode symbols.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use envprobe_lib::vartype::DiffKind;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
  pub const REMOVE: &str = "-";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One element of a diff, prefixed with its action symbol.
pub fn print_action(indent: &str, kind: DiffKind, value: &str) {
  let line = format!("{}{}", kind_prefix(kind), value);
  match kind {
    DiffKind::Added => println!("{}{}", indent, line.if_supports_color(Stream::Stdout, |s| s.green())),
    DiffKind::Removed => println!("{}{}", indent, line.if_supports_color(Stream::Stdout, |s| s.red())),
    DiffKind::Kept => println!("{}{}", indent, line.if_supports_color(Stream::Stdout, |s| s.dimmed())),
  }
}

/// Prefix of a diff line, unified diff style.
pub fn kind_prefix(kind: DiffKind) -> &'static str {
  match kind {
    DiffKind::Added => "+",
    DiffKind::Removed => "-",
    DiffKind::Kept => " ",
  }
}

pub fn yes_no(value: bool) -> &'static str {
  if value { "yes" } else { "no" }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
