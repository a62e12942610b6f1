//! Commands that change a variable in the hooked shell.

use anyhow::{Result, bail};
use tracing::debug;

use envprobe_lib::environment::Environment;
use envprobe_lib::shell::Session;
use envprobe_lib::vartype::EnvVar;

use super::{environment, require_session};
use crate::output::print_warning;

pub fn cmd_set(name: &str, value: &str) -> Result<()> {
  let session = require_session()?;
  let mut env = environment(Some(&session));
  let (mut var, _) = env.get(name)?;
  var.set_raw(value)?;
  commit(&session, &mut env, &var)
}

/// Insert `values` at `position`; negative positions count from the end.
pub fn cmd_add(name: &str, values: &[String], position: isize) -> Result<()> {
  let session = require_session()?;
  let mut env = environment(Some(&session));
  let (mut var, _) = env.get(name)?;
  var.insert_at(position, values.to_vec())?;
  commit(&session, &mut env, &var)
}

/// Remove every occurrence of each of `values`.
pub fn cmd_remove(name: &str, values: &[String]) -> Result<()> {
  let session = require_session()?;
  let mut env = environment(Some(&session));
  let (mut var, defined) = env.get(name)?;
  if !defined {
    bail!("{} is not defined", name);
  }
  for value in values {
    if var.remove_value(value)? == 0 {
      print_warning(&format!("{} does not contain {}", name, value));
    }
  }
  commit(&session, &mut env, &var)
}

pub fn cmd_undefine(name: &str) -> Result<()> {
  let session = require_session()?;
  let mut env = environment(Some(&session));
  let (var, defined) = env.get(name)?;
  if !defined {
    print_warning(&format!("{} is not defined", name));
  }
  env.set_variable(&var, true);
  session.unset(name)?;
  debug!(name, "queued undefine");
  Ok(())
}

fn commit(session: &Session, env: &mut Environment, var: &EnvVar) -> Result<()> {
  env.set_variable(var, false);
  session.export(var.name(), &var.raw())?;
  debug!(name = var.name(), var_type = %var.var_type(), "queued export");
  Ok(())
}
