//! Session bootstrap and teardown.

use anyhow::{Context, Result};
use tracing::{debug, info};

use envprobe_lib::platform::paths::session_root;
use envprobe_lib::shell::{Session, Shell};

use super::{environment, require_session};

/// Create a session for the shell `pid`, stamp the environment it starts
/// with, and print the script the shell must evaluate.
///
/// Re-hooking the shell that already owns the current session prints nothing.
pub fn cmd_hook(shell: &str, pid: u32) -> Result<()> {
  let shell: Shell = shell.parse()?;
  if let Ok(session) = Session::from_env()
    && session.pid() == pid
  {
    debug!(pid, dir = %session.dir().display(), "shell already hooked");
    return Ok(());
  }

  let session = Session::create(shell, pid, &session_root())?;
  let mut env = environment(Some(&session));
  env.stamp();
  env.save().context("Failed to stamp the initial environment")?;

  let program = std::env::current_exe()
    .ok()
    .map(|path| path.to_string_lossy().into_owned())
    .unwrap_or_else(|| "envprobe".to_string());
  info!(%shell, pid, dir = %session.dir().display(), "hooked shell");
  print!("{}", shell.hook_script(&session, &program));
  Ok(())
}

/// Print the pending control statements and delete them.
pub fn cmd_consume(detach: bool) -> Result<()> {
  let session = require_session()?;
  print!("{}", session.consume()?);
  if detach {
    session.detach()?;
  }
  Ok(())
}
