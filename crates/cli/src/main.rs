mod cmd;
mod output;
mod shortcut;

use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{DiffFormat, TrackAction, TrackDefault};
use output::{OutputFormat, print_error};

/// envprobe - inspect, edit and snapshot the environment of your shell
#[derive(Parser)]
#[command(name = "envprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the value of a variable
  Get {
    name: String,

    /// Describe the variable instead
    #[arg(short, long)]
    info: bool,
  },

  /// Replace the value of a variable
  Set { name: String, value: String },

  /// Insert elements into an array variable
  Add {
    name: String,

    #[arg(required = true)]
    values: Vec<String>,

    /// Index to insert at; negative values count from the end
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    position: isize,
  },

  /// Remove elements from an array variable
  Remove {
    name: String,

    #[arg(required = true)]
    values: Vec<String>,
  },

  /// Undefine a variable
  Undefine { name: String },

  /// Show changes since the shell was last stamped
  Diff {
    /// Variables to compare; all tracked variables if none are given
    names: Vec<String>,

    #[arg(short, long, value_enum, default_value = "normal")]
    format: DiffFormat,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Record changes into a snapshot
  Save {
    snapshot: String,

    /// Variables to save; all tracked variables if none are given
    names: Vec<String>,
  },

  /// Apply a snapshot to the shell
  Load {
    snapshot: String,

    /// Variables to load; all tracked variables if none are given
    names: Vec<String>,
  },

  /// List snapshots
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Delete a snapshot, or some of its variables
  Delete { snapshot: String, names: Vec<String> },

  /// Show or change which variables save, load and diff consider
  Track {
    name: Option<String>,

    /// Always consider the variable
    #[arg(long, group = "action", requires = "name")]
    track: bool,

    /// Never consider the variable
    #[arg(long, group = "action", requires = "name")]
    ignore: bool,

    /// Drop the explicit rule for the variable
    #[arg(long, group = "action", requires = "name")]
    reset: bool,

    /// Whether variables without an explicit rule are considered
    #[arg(long, value_enum)]
    default: Option<TrackDefault>,

    /// Change the user-wide configuration instead of this shell's
    #[arg(short, long)]
    global: bool,
  },

  /// Show or edit what envprobe knows about a variable
  Describe {
    name: String,

    /// Type to manage the variable as, or "ignored"
    #[arg(short = 't', long = "type")]
    var_type: Option<String>,

    #[arg(short, long)]
    description: Option<String>,

    /// Forget everything stored about the variable
    #[arg(long, conflicts_with_all = ["var_type", "description"])]
    reset: bool,
  },

  /// Print the script hooking a shell into envprobe
  Hook {
    /// bash or zsh
    shell: String,

    /// Process id of the shell
    pid: u32,
  },

  /// Print and clear pending changes for the shell
  Consume {
    /// Also remove the session
    #[arg(long)]
    detach: bool,
  },
}

fn main() -> ExitCode {
  let subcommands: Vec<String> = Cli::command()
    .get_subcommands()
    .map(|c| c.get_name().to_string())
    .chain(std::iter::once("help".to_string()))
    .collect();
  let subcommands: Vec<&str> = subcommands.iter().map(String::as_str).collect();
  let cli = Cli::parse_from(shortcut::expand_args(std::env::args().collect(), &subcommands));

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if cli.verbose {
      EnvFilter::new("debug")
    } else {
      EnvFilter::new("warn")
    }
  });
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Get { name, info } => cmd::cmd_get(&name, info),
    Commands::Set { name, value } => cmd::cmd_set(&name, &value),
    Commands::Add {
      name,
      values,
      position,
    } => cmd::cmd_add(&name, &values, position),
    Commands::Remove { name, values } => cmd::cmd_remove(&name, &values),
    Commands::Undefine { name } => cmd::cmd_undefine(&name),
    Commands::Diff { names, format, output } => cmd::cmd_diff(&names, format, output),
    Commands::Save { snapshot, names } => cmd::cmd_save(&snapshot, &names),
    Commands::Load { snapshot, names } => cmd::cmd_load(&snapshot, &names),
    Commands::List { output } => cmd::cmd_list(output),
    Commands::Delete { snapshot, names } => cmd::cmd_delete(&snapshot, &names),
    Commands::Track {
      name,
      track,
      ignore,
      reset,
      default,
      global,
    } => {
      let action = if track {
        Some(TrackAction::Track)
      } else if ignore {
        Some(TrackAction::Ignore)
      } else if reset {
        Some(TrackAction::Reset)
      } else {
        None
      };
      cmd::cmd_track(name.as_deref(), action, default, global)
    }
    Commands::Describe {
      name,
      var_type,
      description,
      reset,
    } => cmd::cmd_describe(&name, var_type.as_deref(), description.as_deref(), reset),
    Commands::Hook { shell, pid } => cmd::cmd_hook(&shell, pid),
    Commands::Consume { detach } => cmd::cmd_consume(detach),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
