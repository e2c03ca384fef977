//! CLI surface tests for the herald binary

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

mod common;

use assert_cmd::Command;
use common::TempGitRepo;
use predicates::prelude::*;

// =============================================================================
// Argument handling
// =============================================================================

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Merge a source branch"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS").arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_branches_prints_usage_to_stdout() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_single_branch_is_also_a_usage_error() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS").arg("dev");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_repo_path_fails_with_error() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS")
        .args(["--repo-path", "/nonexistent/path/to/repo", "dev", "main"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a git repository"));
}

// =============================================================================
// Full runs through the binary
// =============================================================================

#[test]
fn test_dry_run_reports_plan_without_merging() {
    let repo = TempGitRepo::new();
    repo.branch("feature/PROJ-7");
    repo.commit_file("a.txt", "a\n", "Refine PROJ-7 flow");
    let main_before = repo.rev("main");

    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS")
        .arg("--dry-run")
        .arg("--repo-path")
        .arg(repo.path())
        .args(["feature/PROJ-7", "main"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Merge plan"))
        .stdout(predicate::str::contains("git checkout main"))
        .stdout(predicate::str::contains("Run without --dry-run to execute."));

    assert_eq!(repo.rev("main"), main_before);
}

#[test]
fn test_merge_through_the_binary_updates_target() {
    let repo = TempGitRepo::new();
    repo.branch("dev");
    repo.commit_file("a.txt", "a\n", "Add TEST-1 widget");

    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("GITHUB_ACTIONS")
        .arg("--repo-path")
        .arg(repo.path())
        .args(["dev", "main"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Merge complete!"));

    assert!(repo.message_of("main").starts_with("Merge dev into main\n\n"));
}

// =============================================================================
// Host-triggered mode
// =============================================================================

#[test]
fn test_host_mode_reads_inputs_and_writes_outputs() {
    let repo = TempGitRepo::new();
    repo.branch("dev");
    repo.commit_file("a.txt", "a\n", "Fix PROJ-3");

    let out_dir = tempfile::tempdir().unwrap();
    let output_file = out_dir.path().join("outputs");

    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", &output_file)
        .env("INPUT_SOURCE_BRANCH", "dev")
        .env("INPUT_TARGET_BRANCH", "main")
        .env("INPUT_DRY_RUN", "true")
        .env("INPUT_REPO_PATH", repo.path());

    cmd.assert().success();

    let contents = std::fs::read_to_string(&output_file).expect("outputs written");
    assert!(contents.contains("success=true\n"), "got: {contents}");
    assert!(contents.contains("issue-keys=[\"PROJ-3\"]\n"));
    assert!(contents.contains("commit-message<<EOF\nMerge dev into main\n"));
}

#[test]
fn test_host_mode_missing_branch_input_is_fatal() {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env("GITHUB_ACTIONS", "true")
        .env("INPUT_TARGET_BRANCH", "main")
        .env_remove("INPUT_SOURCE_BRANCH")
        .env_remove("GITHUB_OUTPUT");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "missing required input 'source_branch'",
        ));
}
