use std::path::PathBuf;

use predicates::prelude::*;

use super::common::{SHELL_PID, TestEnv};

fn session_dirs(env: &TestEnv) -> Vec<PathBuf> {
  std::fs::read_dir(env.tmp_path())
    .unwrap()
    .map(|entry| entry.unwrap().path())
    .filter(|path| {
      path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with("envprobe-"))
    })
    .collect()
}

#[test]
fn test_hook_bash_creates_session() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["hook", "bash", "31337"])
    .assert()
    .success()
    .stdout(predicate::str::contains("export ENVPROBE_SHELL_PID=31337"))
    .stdout(predicate::str::contains("export ENVPROBE_SHELL_TYPE=bash"))
    .stdout(predicate::str::contains("ENVPROBE_CONFIG="))
    .stdout(predicate::str::contains("PROMPT_COMMAND="))
    .stdout(predicate::str::contains("consume --detach"));

  let dirs = session_dirs(&env);
  assert_eq!(dirs.len(), 1);
  assert!(
    dirs[0]
      .file_name()
      .unwrap()
      .to_string_lossy()
      .starts_with("envprobe-31337-")
  );

  let state = std::fs::read_to_string(dirs[0].join("state.json")).unwrap();
  let state: serde_json::Value = serde_json::from_str(&state).unwrap();
  assert_eq!(state["NO_COLOR"], "1");
}

#[test]
fn test_hook_zsh() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["hook", "zsh", "31337"])
    .assert()
    .success()
    .stdout(predicate::str::contains("precmd_functions+=(__envprobe_apply)"))
    .stdout(predicate::str::contains("zshexit_functions+=(__envprobe_exit)"));
}

#[test]
fn test_hook_unknown_shell() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["hook", "fish", "31337"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("unsupported shell 'fish'"));
  assert!(session_dirs(&env).is_empty());
}

#[test]
fn test_rehook_same_shell_is_silent() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .args(["hook", "bash", &SHELL_PID.to_string()])
    .assert()
    .success()
    .stdout("");
  assert_eq!(session_dirs(&env).len(), 1);
}

#[test]
fn test_hook_from_child_shell_creates_new_session() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .args(["hook", "bash", "31337"])
    .assert()
    .success()
    .stdout(predicate::str::contains("export ENVPROBE_SHELL_PID=31337"));
  assert_eq!(session_dirs(&env).len(), 2);
}

#[test]
fn test_consume_prints_and_clears() {
  let env = TestEnv::hooked();
  env.cmd().args(["set", "EDITOR", "vim"]).assert().success();

  env
    .cmd()
    .arg("consume")
    .assert()
    .success()
    .stdout("export EDITOR=vim\n");
  assert!(!env.session().control_file().exists());

  env.cmd().arg("consume").assert().success().stdout("");
}

#[test]
fn test_consume_detach_removes_session() {
  let env = TestEnv::hooked();
  env.cmd().args(["set", "EDITOR", "vim"]).assert().success();

  env
    .cmd()
    .args(["consume", "--detach"])
    .assert()
    .success()
    .stdout("export EDITOR=vim\n");
  assert!(!env.session_dir().exists());

  env
    .cmd()
    .arg("consume")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("is gone"));
}

#[test]
fn test_consume_requires_hooked_shell() {
  let env = TestEnv::new();

  env.cmd().arg("consume").assert().code(1);
}
