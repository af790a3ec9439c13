use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const TOKEN_ENV: &str = "LOCALESYNC_ACCESS_TOKEN";

fn write_config(dir: &Path, content: &str) {
    std::fs::write(dir.join(".localesync.yml"), content).unwrap();
}

fn localesync(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("localesync").unwrap();
    cmd.current_dir(dir).env_remove(TOKEN_ENV).env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("localesync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"));
}

#[test]
fn push_fails_fast_on_duplicated_placeholders() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(
        tmp.path(),
        r#"
localesync:
  access_token: secret
  project_id: p1
  push:
    sources:
      - file: ./<locale_code>/<tag>/<locale_code>.yml
"#,
    );

    localesync(tmp.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "<locale_code> can only occur once in a file pattern!",
        ));
}

#[test]
fn pull_rejects_wildcard_targets() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(
        tmp.path(),
        r#"
localesync:
  access_token: secret
  project_id: p1
  pull:
    targets:
      - file: ./locales/*/<locale_code>.yml
"#,
    );

    localesync(tmp.path())
        .arg("pull")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot include any '*'"));
}

#[test]
fn push_without_sources_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(tmp.path(), "localesync:\n  access_token: secret\n  project_id: p1\n");

    localesync(tmp.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no sources for upload specified"));
}

#[test]
fn missing_access_token_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(
        tmp.path(),
        "localesync:\n  project_id: p1\n  push:\n    sources:\n      - file: ./<locale_code>.yml\n",
    );

    localesync(tmp.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access token specified"));
}

#[test]
fn access_token_flag_satisfies_token_check() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(
        tmp.path(),
        "localesync:\n  project_id: p1\n  push:\n    sources:\n      - file: ./<locale_code>/<locale_code>.yml\n",
    );

    // Gets past config validation and fails on the pattern instead.
    localesync(tmp.path())
        .args(["--access-token", "secret", "push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("can only occur once"));
}

#[test]
fn explicit_config_path_is_used() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("custom.yml");
    std::fs::write(&config, "localesync:\n  access_token: secret\n  project_id: p1\n").unwrap();

    localesync(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("pull")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no targets for download specified"));
}

#[test]
fn unparsable_config_names_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_config(tmp.path(), "localesync: [1, 2");

    localesync(tmp.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains(".localesync.yml"));
}
