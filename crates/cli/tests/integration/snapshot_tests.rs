use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_save_records_changes() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");
  env.set_var("PAGER", "less");
  env.hook();
  env.set_var("PATH", "/opt/bin:/usr/bin");
  env.set_var("EDITOR", "vim");
  env.remove_var("PAGER");

  env
    .cmd()
    .args(["save", "work"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Saved 3 variables to work"));

  let snapshot = env.read_snapshot("work");
  assert_eq!(snapshot["variables"]["EDITOR"], "vim");
  let path = snapshot["variables"]["PATH"].as_array().unwrap();
  assert!(path.contains(&serde_json::json!(["+", "/opt/bin"])));
  assert!(path.contains(&serde_json::json!(["-", "/bin"])));
  assert_eq!(snapshot["unset"], serde_json::json!(["PAGER"]));

  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_save_merges_into_existing_snapshot() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.hook();

  env.set_var("PATH", "/a:/usr/bin");
  env.cmd().args(["save", "work"]).assert().success();
  env.set_var("PATH", "/a:/b:/usr/bin");
  env.cmd().args(["save", "work"]).assert().success();

  let snapshot = env.read_snapshot("work");
  let path = snapshot["variables"]["PATH"].as_array().unwrap();
  assert!(path.contains(&serde_json::json!(["+", "/a"])));
  assert!(path.contains(&serde_json::json!(["+", "/b"])));
}

#[test]
fn test_save_only_named_variables() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");
  env.set_var("PAGER", "less");

  env.cmd().args(["save", "work", "PAGER"]).assert().success();

  let snapshot = env.read_snapshot("work");
  assert_eq!(snapshot["variables"]["PAGER"], "less");
  assert!(snapshot["variables"].get("EDITOR").is_none());

  env
    .cmd()
    .arg("diff")
    .assert()
    .success()
    .stdout(predicate::str::contains("+ EDITOR"))
    .stdout(predicate::str::contains("PAGER").not());
}

#[test]
fn test_save_skips_ignored_variables() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");
  env.set_var("PAGER", "less");

  env.cmd().args(["track", "--ignore", "PAGER"]).assert().success();
  env.cmd().args(["save", "work"]).assert().success();

  let snapshot = env.read_snapshot("work");
  assert_eq!(snapshot["variables"]["EDITOR"], "vim");
  assert!(snapshot["variables"].get("PAGER").is_none());
}

#[test]
fn test_save_without_changes() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .args(["save", "work"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes to save"));
  assert!(!env.snapshot_path("work").exists());
}

#[test]
fn test_save_requires_hooked_shell() {
  let mut env = TestEnv::new();
  env.set_var("EDITOR", "vim");

  env.cmd().args(["save", "work"]).assert().code(1);
}

#[test]
fn test_save_rejects_invalid_name() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");

  env
    .cmd()
    .args(["save", "../outside"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("invalid snapshot name"));
}

#[test]
fn test_load_applies_snapshot() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.set_var("PAGER", "less");
  env.hook();
  env.write_snapshot(
    "work",
    r#"{"variables": {"EDITOR": "vim", "PATH": [["+", "/opt/bin"]]}, "unset": ["PAGER"]}"#,
  );

  env
    .cmd()
    .args(["load", "work"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Loaded 3 variables from work"));

  let control = env.control();
  let lines: Vec<&str> = control.lines().collect();
  assert_eq!(lines.len(), 3);
  assert_eq!(lines[0], "export EDITOR=vim");
  assert_eq!(lines[1], "unset PAGER");
  assert!(lines[2].starts_with("export PATH="));
  assert!(lines[2].contains("/opt/bin:/usr/bin"));

  let state = std::fs::read_to_string(env.session().state_file()).unwrap();
  let state: serde_json::Value = serde_json::from_str(&state).unwrap();
  assert_eq!(state["EDITOR"], "vim");
  assert!(state.get("PAGER").is_none());
}

#[test]
fn test_load_value_that_no_longer_fits_the_type() {
  let mut env = TestEnv::new();
  env.set_var("COUNT", "5");
  env.hook();
  env.write_snapshot("work", r#"{"variables": {"ALPHA": "1", "COUNT": "abc"}}"#);

  env
    .cmd()
    .args(["load", "work"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Loaded 2 variables from work"));
  assert_eq!(env.control(), "export ALPHA=1\nexport COUNT=abc\n");

  let state = std::fs::read_to_string(env.session().state_file()).unwrap();
  let state: serde_json::Value = serde_json::from_str(&state).unwrap();
  assert_eq!(state["COUNT"], "abc");
}

#[test]
fn test_failed_load_queues_nothing() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.hook();
  env.write_snapshot(
    "work",
    r#"{"variables": {"ALPHA": "1", "PATH": [["+", "/opt/bin:/sneaky"]]}}"#,
  );

  env
    .cmd()
    .args(["load", "work"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Failed to load PATH"));
  assert_eq!(env.control(), "");

  let state = std::fs::read_to_string(env.session().state_file()).unwrap();
  let state: serde_json::Value = serde_json::from_str(&state).unwrap();
  assert!(state.get("ALPHA").is_none());
}

#[test]
fn test_load_skips_invalid_names() {
  let env = TestEnv::hooked();
  env.write_snapshot(
    "work",
    r#"{"variables": {"A;touch pwned;B": "x", "EDITOR": "vim"}, "unset": ["FOO BAR"]}"#,
  );

  env
    .cmd()
    .args(["load", "work"])
    .assert()
    .success()
    .stderr(predicate::str::contains("is not a valid variable name"))
    .stdout(predicate::str::contains("Loaded 1 variable from work"));
  assert_eq!(env.control(), "export EDITOR=vim\n");
}

#[test]
fn test_load_named_variables_only() {
  let env = TestEnv::hooked();
  env.write_snapshot("work", r#"{"variables": {"EDITOR": "vim", "PAGER": "less"}}"#);

  env.cmd().args(["load", "work", "PAGER"]).assert().success();
  assert_eq!(env.control(), "export PAGER=less\n");
}

#[test]
fn test_load_missing_snapshot() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .args(["load", "nothing"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_save_then_load_shortcuts() {
  let mut env = TestEnv::hooked();
  env.set_var("EDITOR", "vim");
  env.cmd().arg("{work").assert().success();

  env.remove_var("EDITOR");
  env.stamp();
  env.cmd().arg("}work").assert().success();
  assert_eq!(env.control(), "export EDITOR=vim\n");
}

#[test]
fn test_list_snapshots() {
  let env = TestEnv::new();

  env
    .cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("No snapshots"));

  env.write_snapshot("work", "{}");
  env.write_snapshot("project/build", "{}");
  env
    .cmd()
    .arg("list")
    .assert()
    .success()
    .stdout("project/build\nwork\n");

  let output = env.cmd().args(["list", "-o", "json"]).output().unwrap();
  let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(names, vec!["project/build", "work"]);
}

#[test]
fn test_delete_snapshot() {
  let env = TestEnv::new();
  env.write_snapshot("work", r#"{"variables": {"EDITOR": "vim"}}"#);

  env.cmd().args(["delete", "work"]).assert().success();
  assert!(!env.snapshot_path("work").exists());
  assert!(!env.snapshot_path("work").with_extension("json.lock").exists());

  env
    .cmd()
    .args(["delete", "work"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_delete_entries() {
  let env = TestEnv::new();
  env.write_snapshot(
    "work",
    r#"{"variables": {"EDITOR": "vim", "PAGER": "less"}, "unset": ["BROWSER"]}"#,
  );

  env.cmd().args(["delete", "work", "EDITOR", "BROWSER"]).assert().success();
  let snapshot = env.read_snapshot("work");
  assert_eq!(snapshot["variables"], serde_json::json!({"PAGER": "less"}));
  assert_eq!(snapshot["unset"], serde_json::json!([]));

  env
    .cmd()
    .args(["delete", "work", "PAGER"])
    .assert()
    .success()
    .stdout(predicate::str::contains("no entries left"));
  assert!(!env.snapshot_path("work").exists());
}
