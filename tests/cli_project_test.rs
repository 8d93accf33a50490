//! Integration tests for `sspm project ...`.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_create_list_close_scenario() {
    let env = TestEnv::init();

    let a = env.create_project("Project A");
    assert_eq!(a, "P_0000");
    let listed = env.json(&["project", "list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["projects"][0]["status"], "new");
    assert_eq!(listed["projects"][0]["end_date"], "");
    assert_eq!(listed["projects"][0]["title"], "Project A");

    let b = env.create_project("Project B");
    assert_eq!(b, "P_0001");
    assert_eq!(env.json(&["project", "list"])["count"], 2);

    env.json(&["project", "set", &a, "user.collaborators", "Jörg Müller"]);
    let value = env.json(&["project", "get", &a, "user.collaborators"]);
    assert_eq!(value["value"], "Jörg Müller");

    let closed = env.json(&["project", "close", &a, "now"]);
    assert_eq!(closed["status"], "completed");
    assert_ne!(closed["end_date"], "");

    let closed = env.json(&["project", "close", &b, "latest", "--status", "dropped"]);
    assert_eq!(closed["status"], "dropped");
    assert_ne!(closed["end_date"], "");

    let listed = env.json(&["project", "list"]);
    assert_eq!(listed["projects"][0]["status"], "completed");
    assert_eq!(listed["projects"][1]["status"], "dropped");
}

#[test]
fn test_create_writes_tree_and_counter() {
    let env = TestEnv::init();
    let created = env.json(&[
        "project",
        "create",
        "--title",
        "Nuclei",
        "--user-name",
        "John Doe",
        "--user-email",
        "john.doe@example.com",
        "--user-group",
        "Group 1",
        "--short-descr",
        "Segment nuclei in 3D stacks.",
        "--date",
        "15/11/2023",
    ]);
    assert_eq!(created["git_initialized"], false);

    let project = env.root().join("2023").join("11").join("P_0000");
    assert!(project.join("code/notebooks").is_dir());
    assert!(project.join("references").is_dir());
    assert_eq!(
        fs::read_to_string(project.join("metadata/description.md")).unwrap(),
        "Segment nuclei in 3D stacks."
    );
    let metadata = fs::read_to_string(project.join("metadata/metadata.ini")).unwrap();
    assert!(metadata.contains("[project]\ntitle = Nuclei\nstart_date = 15/11/2023\n"));
    assert_eq!(
        fs::read_to_string(env.root().join(".projects")).unwrap(),
        "last_id=0\n"
    );
}

#[test]
fn test_create_existing_folder_fails() {
    let env = TestEnv::init();
    fs::create_dir_all(env.root().join("2022/6/P_0000")).unwrap();

    env.sspm()
        .args([
            "project",
            "create",
            "--title",
            "Project A",
            "--user-name",
            "John Doe",
            "--user-email",
            "john.doe@example.com",
            "--user-group",
            "Group 1",
            "--date",
            "03/06/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(env.root().join(".projects")).unwrap(),
        "last_id=-1\n"
    );
}

#[test]
fn test_create_rejects_bad_email() {
    let env = TestEnv::init();
    env.sspm()
        .args([
            "project",
            "create",
            "--title",
            "Project A",
            "--user-name",
            "John Doe",
            "--user-email",
            "john.doe",
            "--user-group",
            "Group 1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid e-mail"));
    assert_eq!(env.json(&["project", "list"])["count"], 0);
}

#[test]
fn test_invalid_status_is_rejected() {
    let env = TestEnv::init();
    let id = env.create_project("Project A");
    env.json(&["project", "set", &id, "project.status", "in progress"]);

    env.sspm()
        .args(["project", "set", &id, "project.status", "finished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finished"));
    env.sspm()
        .args(["project", "close", &id, "now", "--status", "finished"])
        .assert()
        .failure();

    let value = env.json(&["project", "get", &id, "project.status"]);
    assert_eq!(value["value"], "in progress");
    let value = env.json(&["project", "get", &id, "project.end_date"]);
    assert_eq!(value["value"], "");
}

#[test]
fn test_set_reports_stored_value() {
    let env = TestEnv::init();
    let id = env.create_project("Project A");

    let stored = env.json(&["project", "set", &id, "project.description", "- item\n  - nested"]);
    assert_eq!(stored["value"], "- item\n- nested");
    let value = env.json(&["project", "get", &id, "project.description"]);
    assert_eq!(value["value"], stored["value"]);
}

#[test]
fn test_invalid_close_mode() {
    let env = TestEnv::init();
    let id = env.create_project("Project A");
    env.sspm()
        .args(["project", "close", &id, "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("close mode"));
}

#[test]
fn test_unknown_and_empty_keys() {
    let env = TestEnv::init();
    let id = env.create_project("Project A");

    env.sspm()
        .args(["project", "get", &id, "project.owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
    env.sspm()
        .args(["project", "set", &id, "user.email", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_get_defaults_to_title() {
    let env = TestEnv::init();
    env.create_project("Project A");
    env.sspm()
        .args(["-H", "project", "get", "0"])
        .assert()
        .success()
        .stdout("Project A\n");
}

#[test]
fn test_unknown_project() {
    let env = TestEnv::init();
    env.sspm()
        .args(["project", "get", "P_0042"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_list_filter_and_human_output() {
    let env = TestEnv::init();
    env.create_project("Project A");
    env.create_project("Project B");

    let filtered = env.json(&["project", "list", "P_0001"]);
    assert_eq!(filtered["count"], 1);
    assert_eq!(filtered["projects"][0]["title"], "Project B");

    env.sspm()
        .args(["-H", "project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 project(s):"))
        .stdout(predicate::str::contains("P_0000"))
        .stdout(predicate::str::contains("[new] Project A"));
}

#[test]
fn test_keys() {
    let env = TestEnv::new();
    let keys = env.json(&["project", "keys"]);
    let keys: Vec<&str> = keys["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert!(keys.contains(&"project.status"));
    assert!(keys.contains(&"user.collaborators"));
}

#[test]
fn test_open_dry_run() {
    let env = TestEnv::init();
    env.create_project("Project A");
    let result = env.json(&["project", "open", "P_0000", "--dry-run"]);
    assert_eq!(result["launched"], false);
    assert!(result["path"].as_str().unwrap().ends_with("P_0000"));
}

#[test]
fn test_external_data_mirror() {
    let env = TestEnv::new();
    let external = TestEnv::new();
    env.sspm()
        .args(["init", "--location"])
        .arg(env.root())
        .arg("--external-data")
        .arg(external.root())
        .assert()
        .success();
    env.sspm()
        .args(["config", "set", "tools.use_git", "False"])
        .assert()
        .success();

    let id = env.create_project("Project A");
    assert!(external.root().join("2022/6").join(&id).is_dir());

    let result = env.json(&["project", "open", &id, "--external", "--dry-run"]);
    assert!(result["path"].as_str().unwrap().ends_with(&id));
}

#[test]
fn test_create_with_git() {
    if which::which("git").is_err() {
        return;
    }
    let env = TestEnv::init();
    env.sspm()
        .args(["config", "set", "tools.use_git", "True"])
        .assert()
        .success();

    let created = env.json(&[
        "project",
        "create",
        "--title",
        "Project A",
        "--user-name",
        "John Doe",
        "--user-email",
        "john.doe@example.com",
        "--user-group",
        "Group 1",
    ]);
    assert_eq!(created["git_initialized"], true);
    let path = std::path::PathBuf::from(created["path"].as_str().unwrap());
    assert!(path.join(".git").is_dir());
    assert!(path.join(".gitignore").is_file());
}
