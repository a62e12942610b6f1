//! Snapshot listing and deletion.

use anyhow::Result;
use tracing::info;

use envprobe_lib::snapshot::{SnapshotError, SnapshotStore};

use crate::output::{OutputFormat, print_info, print_json, print_success, print_warning};

pub fn cmd_list(output: OutputFormat) -> Result<()> {
  let store = SnapshotStore::default_store();
  let names = store.list()?;

  if output.is_json() {
    return print_json(&names);
  }
  if names.is_empty() {
    print_info("No snapshots");
    return Ok(());
  }
  for name in names {
    println!("{}", name);
  }
  Ok(())
}

/// Delete a whole snapshot, or only the given variables from it. A snapshot
/// left without entries is deleted as well.
pub fn cmd_delete(snapshot: &str, names: &[String]) -> Result<()> {
  let store = SnapshotStore::default_store();

  if names.is_empty() {
    store.delete(snapshot)?;
    info!(snapshot, "deleted snapshot");
    print_success(&format!("Deleted snapshot {}", snapshot));
    return Ok(());
  }

  if !store.exists(snapshot)? {
    return Err(SnapshotError::NotFound(snapshot.to_string()).into());
  }
  let mut file = store.open_for_update(snapshot)?;
  let recorded = file.get_mut()?;
  let mut removed = 0;
  for name in names {
    if recorded.remove(name) {
      removed += 1;
    } else {
      print_warning(&format!("{} is not part of {}", name, snapshot));
    }
  }
  let now_empty = recorded.is_empty();
  file.close()?;

  if now_empty {
    store.delete(snapshot)?;
    info!(snapshot, "deleted emptied snapshot");
    print_success(&format!("Deleted snapshot {}, no entries left", snapshot));
  } else {
    print_success(&format!("Removed {} variable{} from {}", removed, if removed == 1 { "" } else { "s" }, snapshot));
  }
  Ok(())
}
