//! Shell integration.
//!
//! envprobe runs as a child of the interactive shell and cannot change that
//! shell's environment directly. Instead it appends statements to a control
//! file in the session directory; the hook installed by [`Shell::hook_script`]
//! evaluates and deletes that file before every prompt.

mod session;

use std::fmt;
use std::str::FromStr;

pub use session::{CONTROL_FILENAME, STATE_FILENAME, Session, SessionError, TRACKING_FILENAME};

use crate::consts::{SESSION_DIR_VAR, SHELL_PID_VAR, SHELL_TYPE_VAR};

/// Shells envprobe can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Bash,
  Zsh,
}

impl Shell {
  pub const ALL: [Shell; 2] = [Shell::Bash, Shell::Zsh];

  pub fn as_str(&self) -> &'static str {
    match self {
      Shell::Bash => "bash",
      Shell::Zsh => "zsh",
    }
  }

  /// Statement setting `name` to `value`.
  pub fn export_var(&self, name: &str, value: &str) -> String {
    match self {
      Shell::Bash | Shell::Zsh => format!("export {}={}", name, quote(value)),
    }
  }

  /// Statement undefining `name`.
  pub fn unset_var(&self, name: &str) -> String {
    match self {
      Shell::Bash | Shell::Zsh => format!("unset {}", name),
    }
  }

  /// Script the shell evaluates once to join a session.
  ///
  /// `program` is how the hook invokes envprobe on exit.
  pub fn hook_script(&self, session: &Session, program: &str) -> String {
    let dir = session.dir().to_string_lossy();
    let mut lines = vec![
      self.export_var(SHELL_PID_VAR, &session.pid().to_string()),
      self.export_var(SHELL_TYPE_VAR, self.as_str()),
      self.export_var(SESSION_DIR_VAR, &dir),
      format!("alias ep={}", quote(program)),
    ];
    lines.push(apply_function(session));

    lines.push(format!(
      "__envprobe_exit() {{\n  {} consume --detach >/dev/null 2>&1\n}}",
      quote(program)
    ));
    match self {
      Shell::Bash => {
        lines.push(r#"PROMPT_COMMAND="__envprobe_apply${PROMPT_COMMAND:+;$PROMPT_COMMAND}""#.to_string());
        lines.push(BASH_EXIT_TRAP.to_string());
      }
      Shell::Zsh => {
        lines.push("typeset -ag precmd_functions zshexit_functions".to_string());
        lines.push("precmd_functions+=(__envprobe_apply)".to_string());
        lines.push("zshexit_functions+=(__envprobe_exit)".to_string());
      }
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
  }
}

/// Bash has a single EXIT trap. Keep whatever the user installed and run it
/// after detaching; a trap that already detaches is not chained again.
const BASH_EXIT_TRAP: &str = r#"__envprobe_saved_trap() {
  case "$3" in
    *__envprobe_exit*) ;;
    *) __envprobe_prev_exit="$3" ;;
  esac
}
eval "__envprobe_saved_trap $(trap -p EXIT)"
unset -f __envprobe_saved_trap
trap '__envprobe_exit; eval "${__envprobe_prev_exit-}"' EXIT"#;

fn apply_function(session: &Session) -> String {
  let control = quote(&session.control_file().to_string_lossy());
  format!(
    r#"__envprobe_apply() {{
  if [ -f {control} ]; then
    local __envprobe_control
    __envprobe_control="$(cat {control})"
    rm -f {control}
    eval "$__envprobe_control"
  fi
}}"#
  )
}

/// POSIX shell quoting.
fn quote(value: &str) -> String {
  shlex::try_quote(value)
    .map(|s| s.into_owned())
    .unwrap_or_else(|_| format!("'{}'", value.replace('\'', r"'\''")))
}

impl fmt::Display for Shell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Shell {
  type Err = SessionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Shell::ALL
      .into_iter()
      .find(|shell| shell.as_str() == s)
      .ok_or_else(|| SessionError::UnknownShell(s.to_string()))
  }
}
