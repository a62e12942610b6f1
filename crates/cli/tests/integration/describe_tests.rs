use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_describe_unknown_variable() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["describe", "EDITOR"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No information about EDITOR"));
}

#[test]
fn test_describe_stores_user_information() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["describe", "EDITOR", "--description", "Preferred text editor"])
    .assert()
    .success();

  env
    .cmd()
    .args(["describe", "EDITOR"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Preferred text editor"))
    .stdout(predicate::str::contains("Source: local"));

  env
    .cmd()
    .args(["get", "--info", "EDITOR"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Preferred text editor"));
}

#[test]
fn test_configured_type_changes_resolution() {
  let mut env = TestEnv::new();
  env.set_var("MANPATH", "/usr/share/man:/usr/local/man");

  env
    .cmd()
    .args(["get", "MANPATH"])
    .assert()
    .success()
    .stdout("/usr/share/man:/usr/local/man\n");

  env.cmd().args(["describe", "MANPATH", "--type", "path"]).assert().success();
  env
    .cmd()
    .args(["get", "MANPATH"])
    .assert()
    .success()
    .stdout("/usr/share/man\n/usr/local/man\n");
}

#[test]
fn test_ignored_type_makes_variable_unmanaged() {
  let mut env = TestEnv::new();
  env.set_var("TOKEN", "secret");

  env.cmd().args(["describe", "TOKEN", "--type", "ignored"]).assert().success();
  env
    .cmd()
    .args(["get", "TOKEN"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not managed"));
}

#[test]
fn test_describe_rejects_unknown_type() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["describe", "EDITOR", "--type", "bogus"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("unknown variable type"));
}

#[test]
fn test_describe_reset() {
  let env = TestEnv::new();

  env.cmd().args(["describe", "EDITOR", "-d", "Editor"]).assert().success();
  env
    .cmd()
    .args(["describe", "EDITOR", "--reset"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Forgot information about EDITOR"));
  env
    .cmd()
    .args(["describe", "EDITOR"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No information about EDITOR"));
  env
    .cmd()
    .args(["describe", "EDITOR", "--reset", "-d", "x"])
    .assert()
    .code(2);
}
