use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use tracing::info;

use envprobe_lib::heuristic::IGNORED_TYPE;
use envprobe_lib::platform::paths::user_variables_dir;
use envprobe_lib::varinfo::{SOURCE_LOCAL, VarInfo, VarInfoLookup, VarInfoStore};
use envprobe_lib::vartype::VarType;

use crate::output::{print_info, print_stat, print_success};

/// Show or edit the user's information about `name`.
pub fn cmd_describe(
  name: &str,
  var_type: Option<&str>,
  description: Option<&str>,
  reset: bool,
) -> Result<()> {
  let store = VarInfoStore::new(user_variables_dir());

  if reset {
    if store.remove(name)? {
      info!(name, "removed variable information");
      print_success(&format!("Forgot information about {}", name));
    } else {
      print_info(&format!("No information stored for {}", name));
    }
    return Ok(());
  }

  if var_type.is_none() && description.is_none() {
    return show(name);
  }

  if let Some(var_type) = var_type
    && var_type != IGNORED_TYPE
  {
    var_type.parse::<VarType>()?;
  }

  let mut record = store.get(name)?.unwrap_or_default();
  if let Some(var_type) = var_type {
    record.var_type = Some(var_type.to_string());
  }
  if let Some(description) = description {
    record.description = Some(description.to_string());
  }
  record.source = SOURCE_LOCAL.to_string();
  store.set(name, record)?;

  info!(name, "updated variable information");
  print_success(&format!("Updated information about {}", name));
  Ok(())
}

fn show(name: &str) -> Result<()> {
  let Some(record) = VarInfoLookup::default_lookup().get(name)? else {
    print_info(&format!("No information about {}", name));
    return Ok(());
  };
  let VarInfo {
    var_type,
    description,
    source,
  } = record;

  println!("{}", name.if_supports_color(Stream::Stdout, |s| s.bold()));
  if let Some(var_type) = var_type {
    print_stat("Type", &var_type);
  }
  if let Some(description) = description {
    print_stat("Description", &description);
  }
  if !source.is_empty() {
    print_stat("Source", &source);
  }
  Ok(())
}
