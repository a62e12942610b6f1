/// Application name, used for directory names.
pub const APP_NAME: &str = "envprobe";

/// Process id of the hooked interactive shell.
pub const SHELL_PID_VAR: &str = "ENVPROBE_SHELL_PID";

/// Kind of the hooked interactive shell (`bash`, `zsh`).
pub const SHELL_TYPE_VAR: &str = "ENVPROBE_SHELL_TYPE";

/// Private per-session directory created by `hook`.
pub const SESSION_DIR_VAR: &str = "ENVPROBE_CONFIG";

/// Variables envprobe sets for its own bookkeeping. These are never managed.
pub const INTERNAL_VARIABLES: &[&str] = &[SHELL_PID_VAR, SHELL_TYPE_VAR, SESSION_DIR_VAR];
