//! The `briefly` binary's command-line surface

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::fake_backend;

fn briefly(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("briefly").expect("binary is built");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd.env_remove("BRIEFLY_API_URL");
    cmd
}

#[test]
fn test_help_lists_session_commands() {
    let dir = TempDir::new().unwrap();
    briefly(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("--session"));
}

#[test]
fn test_invalid_api_url_is_reported() {
    let dir = TempDir::new().unwrap();
    briefly(&dir)
        .args(["--api-url", "localhost:8000", "sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API URL must start with"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sessions_list_prints_names_and_dates() {
    let base_url = fake_backend::spawn().await;
    let dir = TempDir::new().unwrap();

    // The backend runs on the runtime while the binary blocks a worker
    let output = tokio::task::spawn_blocking(move || {
        briefly(&dir)
            .args(["--api-url", &base_url, "sessions", "list"])
            .output()
            .expect("binary runs")
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Q4 Planning Meeting"))
        .stdout(predicate::str::contains("Jan 5, 2025"))
        .stdout(predicate::str::contains("Action items agreed"));
}
