use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_diff_without_changes() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_diff_shows_new_variable() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");

  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("+ EDITOR (string)"))
    .stdout(predicate::str::contains("    +vim"));
}

#[test]
fn test_diff_shows_array_changes() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");
  env.hook();
  env.set_var("PATH", "/opt/bin:/usr/bin");

  let output = env.cmd().arg("diff").output().unwrap();
  assert!(output.status.success());
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("~ PATH (path)"));
  assert!(stdout.contains("+/opt/bin"));
  assert!(stdout.contains("-/bin"));
  assert!(!stdout.contains("/usr/bin"));
}

#[test]
fn test_diff_unified_format() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");
  env.hook();
  env.set_var("PATH", "/opt/bin:/usr/bin");

  env
    .cmd()
    .args(["diff", "--format", "unified", "PATH"])
    .assert()
    .success()
    .stdout("--- PATH (stamped)\n+++ PATH (current)\n-/bin\n+/opt/bin\n /usr/bin\n");
}

#[test]
fn test_diff_json() {
  let mut env = TestEnv::new();
  env.set_var("PAGER", "less");
  env.hook();
  env.remove_var("PAGER");
  env.set_var("EDITOR", "vim");

  let output = env.cmd().args(["diff", "-o", "json"]).output().unwrap();
  assert!(output.status.success());
  let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let entries = entries.as_array().unwrap();
  assert_eq!(entries.len(), 2);

  assert_eq!(entries[0]["name"], "EDITOR");
  assert_eq!(entries[0]["kind"], "added");
  assert_eq!(entries[0]["old"], serde_json::Value::Null);
  assert_eq!(entries[0]["new"], "vim");
  assert_eq!(entries[0]["actions"], serde_json::json!([["+", "vim"]]));

  assert_eq!(entries[1]["name"], "PAGER");
  assert_eq!(entries[1]["kind"], "removed");
  assert_eq!(entries[1]["type"], "string");
}

#[test]
fn test_diff_respects_tracking() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");

  env.cmd().args(["track", "--ignore", "EDITOR"]).assert().success();
  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes"));

  env
    .cmd()
    .args(["diff", "EDITOR"])
    .assert()
    .success()
    .stdout(predicate::str::contains("EDITOR"));
}

#[test]
fn test_diff_ignores_semantically_equal_paths() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");
  env.hook();
  env.set_var("PATH", "/usr/bin:/bin:");

  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_diff_without_hook_warns() {
  let mut env = TestEnv::new();
  env.set_var("EDITOR", "vim");

  env
    .cmd()
    .args(["diff", "EDITOR"])
    .assert()
    .success()
    .stderr(predicate::str::contains("not hooked"))
    .stdout(predicate::str::contains("+ EDITOR"));
}

#[test]
fn test_diff_shortcut() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");

  env
    .cmd()
    .arg("%EDITOR")
    .assert()
    .success()
    .stdout(predicate::str::contains("+ EDITOR (string)"));
}
