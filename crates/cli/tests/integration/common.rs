//! Shared test helpers for CLI integration tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use envprobe_lib::environment::Environment;
use envprobe_lib::heuristic::HeuristicPipeline;
use envprobe_lib::shell::{Session, Shell};
use tempfile::TempDir;

pub const SHELL_PID: u32 = 4242;

/// Isolated test environment.
///
/// Each test gets its own temporary home with separate config, data and
/// session directories. Commands run with a cleared environment holding only
/// the variables of the simulated shell, so differences are deterministic.
pub struct TestEnv {
  pub temp: TempDir,
  shell_vars: BTreeMap<String, String>,
  session: Option<Session>,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let mut env = Self {
      temp,
      shell_vars: BTreeMap::new(),
      session: None,
    };
    let home = env.dir("home");
    let config = env.dir("config");
    let data = env.dir("data");
    let tmp = env.dir("tmp");
    env.set_var("HOME", &home.to_string_lossy());
    env.set_var("XDG_CONFIG_HOME", &config.to_string_lossy());
    env.set_var("XDG_DATA_HOME", &data.to_string_lossy());
    env.set_var("TMPDIR", &tmp.to_string_lossy());
    env.set_var("NO_COLOR", "1");
    env
  }

  /// A test environment whose shell is hooked, with the current variables
  /// stamped.
  pub fn hooked() -> Self {
    let mut env = Self::new();
    env.hook();
    env
  }

  fn dir(&self, name: &str) -> PathBuf {
    let p = self.temp.path().join(name);
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn config_path(&self) -> PathBuf {
    self.dir("config").join("envprobe")
  }

  pub fn data_path(&self) -> PathBuf {
    self.dir("data").join("envprobe")
  }

  pub fn tmp_path(&self) -> PathBuf {
    self.dir("tmp")
  }

  pub fn snapshot_path(&self, name: &str) -> PathBuf {
    self.data_path().join("snapshots").join(format!("{}.json", name))
  }

  /// Change a variable of the simulated shell, as if the user typed `export`.
  pub fn set_var(&mut self, name: &str, value: &str) {
    self.shell_vars.insert(name.to_string(), value.to_string());
  }

  pub fn remove_var(&mut self, name: &str) {
    self.shell_vars.remove(name);
  }

  /// Create a session and stamp the simulated shell as it is now.
  pub fn hook(&mut self) {
    let session = Session::create(Shell::Bash, SHELL_PID, &self.tmp_path()).unwrap();
    self.session = Some(session);
    self.stamp();
  }

  /// Make the current simulated shell the stamped baseline.
  pub fn stamp(&self) {
    let session = self.session();
    let mut env = Environment::new(
      HeuristicPipeline::with_defaults(None),
      self.shell_vars.clone(),
      Some(session.state_file()),
    );
    env.stamp();
    env.save().unwrap();
  }

  pub fn session(&self) -> &Session {
    self.session.as_ref().expect("test environment is not hooked")
  }

  pub fn session_dir(&self) -> &Path {
    self.session().dir()
  }

  /// Pending control statements, without consuming them.
  pub fn control(&self) -> String {
    std::fs::read_to_string(self.session().control_file()).unwrap_or_default()
  }

  /// Write a snapshot document directly.
  pub fn write_snapshot(&self, name: &str, content: &str) {
    let path = self.snapshot_path(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  pub fn read_snapshot(&self, name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(self.snapshot_path(name)).unwrap();
    serde_json::from_str(&content).unwrap()
  }

  /// The envprobe binary, run inside the simulated shell.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("envprobe");
    cmd.env_clear();
    cmd.envs(&self.shell_vars);
    if let Some(session) = &self.session {
      cmd.env("ENVPROBE_SHELL_PID", SHELL_PID.to_string());
      cmd.env("ENVPROBE_SHELL_TYPE", session.shell().as_str());
      cmd.env("ENVPROBE_CONFIG", session.dir());
    }
    cmd
  }
}
