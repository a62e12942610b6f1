use crate::consts::APP_NAME;
use std::path::PathBuf;

const SNAPSHOTS_DIR: &str = "snapshots";
const DESCRIPTIONS_DIR: &str = "descriptions";
const VARIABLES_DIR: &str = "variables";
const TRACKING_FILENAME: &str = "tracking.json";

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  let userprofile = std::env::var("USERPROFILE").expect("USERPROFILE not set");
  PathBuf::from(userprofile)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  let home = std::env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
  let appdata = std::env::var("APPDATA").expect("APPDATA not set");
  PathBuf::from(appdata).join(APP_NAME)
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
  let config_home = std::env::var("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".config"));
  config_home.join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  let appdata = std::env::var("APPDATA").expect("APPDATA not set");
  PathBuf::from(appdata).join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Named snapshots, one JSON document each.
pub fn snapshots_dir() -> PathBuf {
  data_dir().join(SNAPSHOTS_DIR)
}

/// Community variable descriptions (read-only, imported out of band).
pub fn descriptions_dir() -> PathBuf {
  data_dir().join(DESCRIPTIONS_DIR)
}

/// Variable information edited by the user.
pub fn user_variables_dir() -> PathBuf {
  config_dir().join(VARIABLES_DIR)
}

/// User-wide tracking configuration.
pub fn global_tracking_path() -> PathBuf {
  config_dir().join(TRACKING_FILENAME)
}

/// Parent directory for per-session directories created by `hook`.
///
/// Honours `TMPDIR` on Unix.
pub fn session_root() -> PathBuf {
  std::env::temp_dir()
}
