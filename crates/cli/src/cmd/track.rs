use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use envprobe_lib::config_file::ConfigFile;
use envprobe_lib::lock::LockMode;
use envprobe_lib::platform::paths::global_tracking_path;
use envprobe_lib::tracking::{Scope, TrackingConfig};

use super::{TrackingConfigs, current_session, require_session};
use crate::output::{print_stat, print_success, yes_no};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TrackDefault {
  Yes,
  No,
}

impl TrackDefault {
  fn as_bool(self) -> bool {
    matches!(self, TrackDefault::Yes)
  }
}

/// What to do with the explicit rule of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
  Track,
  Ignore,
  Reset,
}

/// Query or change tracking.
///
/// Without an action or default the current decision is shown: for `name`
/// if given, otherwise the default of each scope.
pub fn cmd_track(
  name: Option<&str>,
  action: Option<TrackAction>,
  default: Option<TrackDefault>,
  global: bool,
) -> Result<()> {
  if action.is_none() && default.is_none() {
    return show(name);
  }

  let scope = if global { Scope::Global } else { Scope::Local };
  let path = scope_path(scope)?;
  let mut file = ConfigFile::<TrackingConfig>::open(&path, LockMode::Exclusive)
    .with_context(|| format!("Failed to open tracking configuration {}", path.display()))?;
  let config = file.get_mut()?;

  if let (Some(name), Some(action)) = (name, action) {
    match action {
      TrackAction::Track => config.track(name),
      TrackAction::Ignore => config.ignore(name),
      TrackAction::Reset => config.reset(name),
    }
    info!(name, ?action, %scope, "changed tracking rule");
  }
  if let Some(default) = default {
    config.set_default(Some(default.as_bool()));
    info!(default = default.as_bool(), %scope, "changed tracking default");
  }
  if scope == Scope::Global && config.default.is_none() {
    config.set_default(Some(true));
  }
  file.close()?;

  print_success(&format!("Updated {} tracking", scope));
  Ok(())
}

fn scope_path(scope: Scope) -> Result<PathBuf> {
  match scope {
    Scope::Global => Ok(global_tracking_path()),
    Scope::Local => Ok(require_session()?.tracking_file()),
  }
}

fn show(name: Option<&str>) -> Result<()> {
  let session = current_session();
  let configs = TrackingConfigs::load(session.as_ref())?;

  match name {
    Some(name) => {
      let (tracked, reason) = configs.tracking().decide(name);
      println!("{}: {} ({})", name, yes_no(tracked), reason);
    }
    None => {
      let describe = |default: Option<bool>| default.map(yes_no).unwrap_or("unset").to_string();
      print_stat("Local default", &describe(configs.local.default));
      print_stat("Global default", &describe(configs.global.default));
    }
  }
  Ok(())
}
