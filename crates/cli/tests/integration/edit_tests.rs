use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_set_requires_hooked_shell() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["set", "EDITOR", "vim"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not hooked"));
}

#[test]
fn test_set_queues_export() {
  let env = TestEnv::hooked();

  env.cmd().args(["set", "EDITOR", "vim"]).assert().success();
  assert_eq!(env.control(), "export EDITOR=vim\n");

  env.cmd().args(["set", "PAGER", "less"]).assert().success();
  assert_eq!(env.control(), "export EDITOR=vim\nexport PAGER=less\n");
}

#[test]
fn test_add_inserts_at_front_and_back() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");
  env.hook();

  env.cmd().args(["add", "PATH", "/opt/bin"]).assert().success();
  assert!(env.control().contains("/opt/bin:/usr/bin:/bin"));

  env.set_var("PATH", "/opt/bin:/usr/bin:/bin");
  env
    .cmd()
    .args(["add", "--position", "-1", "PATH", "/usr/local/bin"])
    .assert()
    .success();
  assert!(env.control().contains("/opt/bin:/usr/bin:/bin:/usr/local/bin"));
}

#[test]
fn test_add_rejects_separator_in_element() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.hook();

  env
    .cmd()
    .args(["add", "PATH", "/a:/b"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("separator"));
  assert_eq!(env.control(), "");
}

#[test]
fn test_remove_drops_every_occurrence() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/bin:/usr/bin:/bin");
  env.hook();

  env.cmd().args(["remove", "PATH", "/bin"]).assert().success();
  assert_eq!(env.control(), "export PATH=/usr/bin\n");
}

#[test]
fn test_remove_warns_about_missing_value() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.hook();

  env
    .cmd()
    .args(["remove", "PATH", "/opt/bin"])
    .assert()
    .success()
    .stderr(predicate::str::contains("does not contain /opt/bin"));
}

#[test]
fn test_set_numeric_rejects_text() {
  let mut env = TestEnv::new();
  env.set_var("HTTP_PORT", "8080");
  env.hook();

  env
    .cmd()
    .args(["set", "HTTP_PORT", "eighty"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not a number"));
  env.cmd().args(["set", "HTTP_PORT", "8081"]).assert().success();
  assert_eq!(env.control(), "export HTTP_PORT=8081\n");
}

#[test]
fn test_undefine_queues_unset() {
  let mut env = TestEnv::new();
  env.set_var("PAGER", "less");
  env.hook();

  env.cmd().args(["undefine", "PAGER"]).assert().success();
  assert_eq!(env.control(), "unset PAGER\n");
}

#[test]
fn test_unmanaged_variables_are_refused() {
  let env = TestEnv::hooked();

  env
    .cmd()
    .args(["set", "_PRIVATE", "x"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not managed"));
  env.cmd().args(["set", "ENVPROBE_SHELL_PID", "1"]).assert().code(1);
}

#[test]
fn test_names_the_shell_cannot_assign_are_refused() {
  let env = TestEnv::hooked();

  let attempts: [&[&str]; 4] = [
    &["set", "FOO BAR", "x"],
    &["set", "A;touch pwned;B", "x"],
    &["add", "$(id)", "x"],
    &["undefine", "A=B"],
  ];
  for args in attempts {
    env
      .cmd()
      .args(args)
      .assert()
      .code(1)
      .stderr(predicate::str::contains("is not a valid variable name"));
  }
  assert_eq!(env.control(), "");
}

#[test]
fn test_get_prints_array_elements_per_line() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin:/bin");

  env
    .cmd()
    .args(["get", "PATH"])
    .assert()
    .success()
    .stdout("/usr/bin\n/bin\n");
}

#[test]
fn test_get_undefined_fails() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["get", "NOT_THERE"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("not defined"));
}

#[test]
fn test_get_info_describes_undefined_variable() {
  let env = TestEnv::new();

  env
    .cmd()
    .args(["get", "--info", "NOT_THERE"])
    .assert()
    .success()
    .stdout(predicate::str::contains("string"))
    .stdout(predicate::str::contains("(undefined)"))
    .stdout(predicate::str::contains("built-in default"));
}

#[test]
fn test_shortcuts_expand() {
  let mut env = TestEnv::new();
  env.set_var("PATH", "/usr/bin");
  env.set_var("PAGER", "less");
  env.hook();

  env.cmd().arg("PAGER").assert().success().stdout("less\n");
  env.cmd().arg("EDITOR=vim").assert().success();
  env.cmd().args(["+PATH", "/opt/bin"]).assert().success();
  env.cmd().arg("!PAGER").assert().success();

  let control = env.control();
  assert!(control.starts_with("export EDITOR=vim\n"));
  assert!(control.contains("/opt/bin:/usr/bin"));
  assert!(control.ends_with("unset PAGER\n"));
}
