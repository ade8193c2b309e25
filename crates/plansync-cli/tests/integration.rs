#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LEGACY: &str = "\
# Auth rollout
Swarm: mega
Phase: 2

## Phase 1: Setup [COMPLETE]

- [x] 1.1: Scaffold crate [SMALL]
- [BLOCKED] 1.2: Wire CI - runner offline [MEDIUM]

## Phase 2: Build [IN PROGRESS]

- [ ] 2.1: Login endpoint [LARGE] (depends: 1.1) ← CURRENT
- [ ] 2.2: Logout endpoint [SMALL]
";

fn plansync(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("plansync").unwrap();
    cmd.current_dir(dir.path()).env("PLANSYNC_ROOT", dir.path());
    cmd
}

fn seed_legacy(dir: &TempDir) {
    std::fs::write(dir.path().join("plan.md"), LEGACY).unwrap();
}

fn read_json(dir: &TempDir) -> serde_json::Value {
    let data = std::fs::read_to_string(dir.path().join("plan.json")).unwrap();
    serde_json::from_str(&data).unwrap()
}

fn task_status(plan: &serde_json::Value, id: &str) -> String {
    plan["phases"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|p| p["tasks"].as_array().unwrap())
        .find(|t| t["id"] == id)
        .map(|t| t["status"].as_str().unwrap().to_string())
        .unwrap()
}

// ---------------------------------------------------------------------------
// plansync show / heal
// ---------------------------------------------------------------------------

#[test]
fn show_without_plan_succeeds() {
    let dir = TempDir::new().unwrap();
    plansync(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan found"));
    assert!(!dir.path().join("plan.json").exists());
}

#[test]
fn show_json_without_plan_prints_null() {
    let dir = TempDir::new().unwrap();
    plansync(&dir)
        .args(["show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("null"));
}

#[test]
fn heal_migrates_legacy_plan() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);

    plansync(&dir)
        .arg("heal")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated"));

    let plan = read_json(&dir);
    assert_eq!(plan["title"], "Auth rollout");
    assert_eq!(plan["migration_status"], "migrated");
    assert_eq!(task_status(&plan, "2.1"), "in_progress");

    let md = std::fs::read_to_string(dir.path().join("plan.md")).unwrap();
    assert!(md.contains("<!-- PLAN_HASH: "));
}

#[test]
fn heal_twice_reports_fresh() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir).arg("heal").assert().success();

    let output = plansync(&dir).args(["heal", "--json"]).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "fresh");
    assert_eq!(report["plan"]["swarm"], "mega");
}

#[test]
fn show_prints_summary() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Auth rollout"))
        .stdout(predicate::str::contains("1/4 completed, 1 in progress, 1 blocked"));
}

#[test]
fn heal_leaves_unrecoverable_prose_untouched() {
    let dir = TempDir::new().unwrap();
    let prose = "just some notes, no plan here\n";
    std::fs::write(dir.path().join("plan.md"), prose).unwrap();

    plansync(&dir)
        .arg("heal")
        .assert()
        .success()
        .stdout(predicate::str::contains("migration_failed"));

    assert!(!dir.path().join("plan.json").exists());
    let md = std::fs::read_to_string(dir.path().join("plan.md")).unwrap();
    assert_eq!(md, prose);
}

// ---------------------------------------------------------------------------
// plansync task
// ---------------------------------------------------------------------------

#[test]
fn task_status_updates_both_files() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);

    plansync(&dir)
        .args(["task", "status", "2.1", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.1: completed"));

    assert_eq!(task_status(&read_json(&dir), "2.1"), "completed");
    let md = std::fs::read_to_string(dir.path().join("plan.md")).unwrap();
    assert!(md.contains("- [x] 2.1: Login endpoint"));
}

#[test]
fn task_status_blocked_records_reason() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);

    plansync(&dir)
        .args(["task", "status", "2.2", "blocked", "--reason", "waiting on design"])
        .assert()
        .success();

    let md = std::fs::read_to_string(dir.path().join("plan.md")).unwrap();
    assert!(md.contains("- [BLOCKED] 2.2: Logout endpoint - waiting on design"));
}

#[test]
fn task_status_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);

    plansync(&dir)
        .args(["task", "status", "9.9", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: 9.9"));
}

#[test]
fn task_status_without_plan_fails() {
    let dir = TempDir::new().unwrap();
    plansync(&dir)
        .args(["task", "status", "1.1", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan not found"));
    assert!(!dir.path().join("plan.json").exists());
}

#[test]
fn task_status_on_prose_plan_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let prose = "Ideas for next quarter, nothing scheduled yet.\n";
    std::fs::write(dir.path().join("plan.md"), prose).unwrap();

    plansync(&dir)
        .args(["task", "status", "1.1", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan not found"));

    let md = std::fs::read_to_string(dir.path().join("plan.md")).unwrap();
    assert_eq!(md, prose);
    assert!(!dir.path().join("plan.json").exists());
}

#[test]
fn task_status_rejects_bad_status() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir)
        .args(["task", "status", "2.1", "finished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn task_next_skips_blocked_work() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir)
        .args(["task", "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.1: Login endpoint"));
}

#[test]
fn task_list_shows_blocker() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BLOCKER"))
        .stdout(predicate::str::contains("runner offline"));
}

#[test]
fn task_get_json() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    let output = plansync(&dir)
        .args(["task", "get", "2.1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["size"], "large");
    assert_eq!(task["depends"][0], "1.1");
}

// ---------------------------------------------------------------------------
// plansync inspect / render / migrate
// ---------------------------------------------------------------------------

#[test]
fn inspect_fails_on_corrupt_canonical() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("plan.json"), "{ not json").unwrap();
    plansync(&dir)
        .arg("inspect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing or invalid"));
    let raw = std::fs::read_to_string(dir.path().join("plan.json")).unwrap();
    assert_eq!(raw, "{ not json");
}

#[test]
fn render_prints_without_writing() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    plansync(&dir).arg("heal").assert().success();
    std::fs::remove_file(dir.path().join("plan.md")).unwrap();

    plansync(&dir)
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Auth rollout"))
        .stdout(predicate::str::contains("<!-- PLAN_HASH: "));
    assert!(!dir.path().join("plan.md").exists());
}

#[test]
fn migrate_prints_json_only() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join("old-plan.md");
    std::fs::write(&legacy, "# Untitled work\n\n## Phase 1: Start\n\n- [ ] 1.1: First step\n").unwrap();

    let output = plansync(&dir)
        .args(["migrate", legacy.to_str().unwrap(), "--swarm", "solo"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["migration_status"], "migrated");
    assert_eq!(plan["swarm"], "solo");
    assert!(!dir.path().join("plan.json").exists());
}

// ---------------------------------------------------------------------------
// plansync config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_without_file_is_ok() {
    let dir = TempDir::new().unwrap();
    plansync(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn config_validate_rejects_multiline_swarm() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plansync.yaml"),
        "default_swarm: \"a\\nb\"\n",
    )
    .unwrap();
    plansync(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("single line"));
}

#[test]
fn auto_heal_disabled_never_writes() {
    let dir = TempDir::new().unwrap();
    seed_legacy(&dir);
    std::fs::write(dir.path().join("plansync.yaml"), "auto_heal: false\n").unwrap();

    plansync(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan found"));
    assert!(!dir.path().join("plan.json").exists());
}
