use anyhow::{Result, bail};
use owo_colors::{OwoColorize, Stream};

use envprobe_lib::varinfo::VarInfoLookup;

use super::{TrackingConfigs, current_session, environment};
use crate::output::{print_stat, yes_no};

/// Print a variable's value, one element per line for arrays.
///
/// With `info`, describe the variable instead; this works for undefined
/// variables too.
pub fn cmd_get(name: &str, info: bool) -> Result<()> {
  let session = current_session();
  let env = environment(session.as_ref());
  let (var, defined) = env.get(name)?;

  if !info {
    if !defined {
      bail!("{} is not defined", name);
    }
    match var.elements() {
      Some(elements) => {
        for element in elements {
          println!("{}", element);
        }
      }
      None => println!("{}", var.raw()),
    }
    return Ok(());
  }

  println!("{}", name.if_supports_color(Stream::Stdout, |s| s.bold()));
  print_stat("Type", var.var_type().as_str());
  if defined {
    print_stat("Value", &var.raw());
  } else {
    print_stat("Value", "(undefined)");
  }

  if let Some(record) = VarInfoLookup::default_lookup().get(name)? {
    if let Some(description) = &record.description {
      print_stat("Description", description);
    }
    if !record.source.is_empty() {
      print_stat("Source", &record.source);
    }
  }

  let configs = TrackingConfigs::load(session.as_ref())?;
  let (tracked, reason) = configs.tracking().decide(name);
  print_stat("Tracked", &format!("{} ({})", yes_no(tracked), reason));
  Ok(())
}
