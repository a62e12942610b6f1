mod describe;
mod diff;
mod edit;
mod get;
mod hook;
mod load;
mod save;
mod snapshot;
mod track;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use envprobe_lib::config_file::ConfigFile;
use envprobe_lib::environment::{Environment, VariableDifference};
use envprobe_lib::heuristic::HeuristicPipeline;
use envprobe_lib::lock::LockMode;
use envprobe_lib::platform::paths::global_tracking_path;
use envprobe_lib::shell::Session;
use envprobe_lib::tracking::{Tracking, TrackingConfig};
use envprobe_lib::varinfo::VarInfoLookup;

pub use describe::cmd_describe;
pub use diff::{DiffFormat, cmd_diff};
pub use edit::{cmd_add, cmd_remove, cmd_set, cmd_undefine};
pub use get::cmd_get;
pub use hook::{cmd_consume, cmd_hook};
pub use load::cmd_load;
pub use save::cmd_save;
pub use snapshot::{cmd_delete, cmd_list};
pub use track::{TrackAction, TrackDefault, cmd_track};

fn heuristics() -> HeuristicPipeline {
  HeuristicPipeline::with_defaults(Some(VarInfoLookup::default_lookup()))
}

/// The hooked shell this process runs in, if any.
fn current_session() -> Option<Session> {
  match Session::from_env() {
    Ok(session) => Some(session),
    Err(err) => {
      debug!(%err, "no usable session");
      None
    }
  }
}

/// Like [`current_session`], for commands that change the shell.
fn require_session() -> Result<Session> {
  Ok(Session::from_env()?)
}

fn environment(session: Option<&Session>) -> Environment {
  Environment::from_process(heuristics(), session.map(Session::state_file))
}

/// Both tracking scopes as stored on disk.
struct TrackingConfigs {
  local: TrackingConfig,
  global: TrackingConfig,
}

impl TrackingConfigs {
  fn load(session: Option<&Session>) -> Result<Self> {
    let local = match session {
      Some(session) => read_tracking(&session.tracking_file())?,
      None => TrackingConfig::default(),
    };
    let global = read_tracking(&global_tracking_path())?;
    Ok(Self { local, global })
  }

  fn tracking(&self) -> Tracking<'_> {
    Tracking::new(&self.local, &self.global)
  }
}

fn read_tracking(path: &Path) -> Result<TrackingConfig> {
  if !path.exists() {
    return Ok(TrackingConfig::default());
  }
  let file = ConfigFile::<TrackingConfig>::open(path, LockMode::Shared)
    .with_context(|| format!("Failed to read tracking configuration {}", path.display()))?;
  Ok(file.get().clone())
}

/// The differences a command acts on: the named variables, or every tracked
/// one when no names are given.
fn select_differences(
  mut differences: BTreeMap<String, VariableDifference>,
  names: &[String],
  tracking: &Tracking<'_>,
) -> Vec<VariableDifference> {
  if names.is_empty() {
    return differences
      .into_values()
      .filter(|d| tracking.is_tracked(&d.name))
      .collect();
  }
  names.iter().filter_map(|name| differences.remove(name)).collect()
}
