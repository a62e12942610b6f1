use anyhow::{Context, Result};
use tracing::info;

use envprobe_lib::snapshot::SnapshotStore;

use super::{TrackingConfigs, environment, require_session, select_differences};
use crate::output::{print_info, print_success};

/// Record the changes since the last stamp into `snapshot`, then stamp them.
///
/// Naming variables bypasses tracking.
pub fn cmd_save(snapshot: &str, names: &[String]) -> Result<()> {
  let session = require_session()?;
  let mut env = environment(Some(&session));
  let configs = TrackingConfigs::load(Some(&session))?;
  let differences = select_differences(env.diff()?, names, &configs.tracking());

  if differences.is_empty() {
    print_info("No changes to save");
    return Ok(());
  }

  let store = SnapshotStore::default_store();
  let mut file = store.open_for_update(snapshot)?;
  let recorded = file.get_mut()?;
  for difference in &differences {
    recorded
      .record_difference(difference)
      .with_context(|| format!("Failed to record {}", difference.name))?;
  }
  file.close()?;

  for difference in &differences {
    match (&difference.new, &difference.old) {
      (Some(new), _) => env.apply_change(new, false)?,
      (None, Some(old)) => env.apply_change(old, true)?,
      (None, None) => {}
    }
  }
  env.save()?;

  info!(snapshot, variables = differences.len(), "saved snapshot");
  print_success(&format!(
    "Saved {} variable{} to {}",
    differences.len(),
    if differences.len() == 1 { "" } else { "s" },
    snapshot
  ));
  Ok(())
}
