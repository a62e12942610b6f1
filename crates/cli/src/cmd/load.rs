use anyhow::{Context, Result};
use tracing::{info, warn};

use envprobe_lib::snapshot::SnapshotStore;
use envprobe_lib::vartype::VarError;

use super::{TrackingConfigs, environment, require_session};
use crate::output::{print_info, print_success, print_warning};

/// Apply `snapshot` to the hooked shell. The loaded values become part of the
/// stamp, so they do not show up as changes afterwards.
///
/// Without names, only tracked variables of the snapshot are loaded.
pub fn cmd_load(snapshot: &str, names: &[String]) -> Result<()> {
  let session = require_session()?;
  let store = SnapshotStore::default_store();
  let recorded = store.load(snapshot)?;

  let selected: Vec<String> = if names.is_empty() {
    let configs = TrackingConfigs::load(Some(&session))?;
    let tracking = configs.tracking();
    recorded
      .keys()
      .into_iter()
      .filter(|name| tracking.is_tracked(name))
      .map(str::to_string)
      .collect()
  } else {
    names.to_vec()
  };

  let mut env = environment(Some(&session));
  // Resolve everything before queueing anything, so a failure leaves the shell
  // untouched.
  let mut planned = Vec::new();
  for name in &selected {
    let Some(instruction) = recorded.get(name) else {
      print_warning(&format!("{} is not part of {}", name, snapshot));
      continue;
    };
    let mut var = match env.get(name) {
      Ok((var, _)) => var,
      Err(VarError::Unmanaged(_)) => {
        warn!(name, "skipping unmanaged variable");
        print_warning(&format!("{} is not managed by envprobe, skipping", name));
        continue;
      }
      Err(e @ VarError::InvalidName(_)) => {
        warn!(name, "skipping invalid variable name");
        print_warning(&format!("{}, skipping", e));
        continue;
      }
      Err(e) => return Err(e.into()),
    };

    let defined = instruction
      .apply_to(&mut var)
      .with_context(|| format!("Failed to load {}", name))?;
    planned.push((var, defined));
  }

  for (var, defined) in &planned {
    if *defined {
      session.export(var.name(), &var.raw())?;
    } else {
      session.unset(var.name())?;
    }
    env.set_variable(var, !defined);
    env.apply_change(var, !defined)?;
  }
  let loaded = planned.len();

  if loaded == 0 {
    print_info("Nothing to load");
    return Ok(());
  }
  env.save()?;

  info!(snapshot, variables = loaded, "loaded snapshot");
  print_success(&format!(
    "Loaded {} variable{} from {}",
    loaded,
    if loaded == 1 { "" } else { "s" },
    snapshot
  ));
  Ok(())
}
