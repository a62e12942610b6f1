//! Per-shell session directories.
//!
//! # Storage Layout
//!
//! ```text
//! {session_root}/envprobe-{pid}-XXXXXX/
//! ├── state.json      # stamped environment (0600)
//! ├── control.sh      # pending statements for the shell
//! └── tracking.json   # local tracking configuration
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{APP_NAME, SESSION_DIR_VAR, SHELL_PID_VAR, SHELL_TYPE_VAR};
use crate::vartype::{VarError, validate_name};

use super::Shell;

pub const STATE_FILENAME: &str = "state.json";
pub const CONTROL_FILENAME: &str = "control.sh";
pub const TRACKING_FILENAME: &str = "tracking.json";

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("this shell is not hooked; add `eval \"$(envprobe hook <shell> $$)\"` to its startup file")]
  NotHooked,

  #[error("unsupported shell '{0}'")]
  UnknownShell(String),

  #[error("invalid shell process id '{0}'")]
  InvalidPid(String),

  #[error("session directory {} is gone", .0.display())]
  MissingDirectory(PathBuf),

  #[error("failed to create session directory in {}: {source}", path.display())]
  Create {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to access {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Var(#[from] VarError),
}

/// A hooked interactive shell and its private directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  shell: Shell,
  pid: u32,
  dir: PathBuf,
}

impl Session {
  /// Create a fresh private directory under `root`.
  pub fn create(shell: Shell, pid: u32, root: &Path) -> Result<Self, SessionError> {
    let create_err = |source| SessionError::Create {
      path: root.to_path_buf(),
      source,
    };
    fs::create_dir_all(root).map_err(create_err)?;
    let dir = tempfile::Builder::new()
      .prefix(&format!("{}-{}-", APP_NAME, pid))
      .tempdir_in(root)
      .map_err(create_err)?
      .keep();
    debug!(%shell, pid, dir = %dir.display(), "created session");

    Ok(Self { shell, pid, dir })
  }

  /// The session of the shell that launched this process.
  pub fn from_env() -> Result<Self, SessionError> {
    let var = |name: &str| std::env::var(name).ok();
    Self::from_vars(var(SHELL_PID_VAR), var(SHELL_TYPE_VAR), var(SESSION_DIR_VAR))
  }

  /// A session is capable when all three values are present, valid, and the
  /// directory still exists.
  pub fn from_vars(pid: Option<String>, shell: Option<String>, dir: Option<String>) -> Result<Self, SessionError> {
    let (Some(pid), Some(shell), Some(dir)) = (pid, shell, dir) else {
      return Err(SessionError::NotHooked);
    };
    let pid: u32 = pid.parse().map_err(|_| SessionError::InvalidPid(pid.clone()))?;
    let shell: Shell = shell.parse()?;
    let dir = PathBuf::from(dir);
    if !dir.is_dir() {
      return Err(SessionError::MissingDirectory(dir));
    }
    Ok(Self { shell, pid, dir })
  }

  pub fn shell(&self) -> Shell {
    self.shell
  }

  pub fn pid(&self) -> u32 {
    self.pid
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn state_file(&self) -> PathBuf {
    self.dir.join(STATE_FILENAME)
  }

  pub fn control_file(&self) -> PathBuf {
    self.dir.join(CONTROL_FILENAME)
  }

  pub fn tracking_file(&self) -> PathBuf {
    self.dir.join(TRACKING_FILENAME)
  }

  /// Queue `name=value` for the shell.
  pub fn export(&self, name: &str, value: &str) -> Result<(), SessionError> {
    validate_name(name)?;
    self.append_control(&self.shell.export_var(name, value))
  }

  /// Queue undefining `name` for the shell.
  pub fn unset(&self, name: &str) -> Result<(), SessionError> {
    validate_name(name)?;
    self.append_control(&self.shell.unset_var(name))
  }

  fn append_control(&self, statement: &str) -> Result<(), SessionError> {
    let path = self.control_file();
    let io_err = |source| SessionError::Io {
      path: path.clone(),
      source,
    };
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .map_err(io_err)?;
    writeln!(file, "{}", statement).map_err(io_err)?;
    debug!(statement, "queued control statement");
    Ok(())
  }

  /// Take the pending statements, leaving no control file behind.
  pub fn consume(&self) -> Result<String, SessionError> {
    let path = self.control_file();
    let io_err = |source| SessionError::Io {
      path: path.clone(),
      source,
    };
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
      Err(e) => return Err(io_err(e)),
    };
    fs::remove_file(&path).map_err(io_err)?;
    Ok(content)
  }

  /// Remove the session directory.
  pub fn detach(self) -> Result<(), SessionError> {
    match fs::remove_dir_all(&self.dir) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(source) => {
        return Err(SessionError::Io { path: self.dir, source });
      }
    }
    debug!(pid = self.pid, "detached session");
    Ok(())
  }
}
