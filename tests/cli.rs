//! End-to-end checks of the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn deskseek() -> Command {
    let mut cmd = Command::cargo_bin("deskseek").expect("binary built");
    // Keep CLI runs hermetic regardless of the developer's environment.
    cmd.env("DESKSEEK_SOCKET", "/tmp/deskseek-test-no-such-socket.sock");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_the_subcommands() {
    deskseek()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("paths"))
        .stdout(predicate::str::contains("reveal"));
}

#[test]
fn status_fails_cleanly_when_the_service_is_down() {
    deskseek()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("status query failed"));
}

#[test]
fn search_degrades_to_empty_categories_when_the_service_is_down() {
    // Fetch failures are per category and non-fatal; the command still
    // renders all three sections.
    deskseek()
        .args(["search", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directories (0)"))
        .stdout(predicate::str::contains("Files (0)"))
        .stdout(predicate::str::contains("Content (0)"));
}

#[test]
fn search_json_output_is_parseable() {
    let output = deskseek()
        .args(["search", "report", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(doc["query"], "report");
    assert!(doc["results"]["directories"].is_array());
    assert!(doc["results"]["files"].is_array());
    assert!(doc["results"]["items"].is_array());
}

#[test]
fn paths_add_fails_cleanly_when_the_service_is_down() {
    // The busy probe runs before the mutation and cannot reach the service.
    deskseek()
        .args(["paths", "add", "/tmp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status query failed"));
}

#[test]
fn socket_flag_overrides_the_environment() {
    deskseek()
        .args(["--socket", "/tmp/deskseek-test-other-socket.sock", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status query failed"));
}
