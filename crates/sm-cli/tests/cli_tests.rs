//! End-to-end tests for the `sm` binary

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled sm binary
fn sm_bin() -> String {
    env!("CARGO_BIN_EXE_sm").to_string()
}

/// Run `sm` inside `dir` and return (stdout, stderr, success).
fn run_sm(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sm_bin())
        .current_dir(dir)
        .env_remove("SM_CONFIG")
        .env_remove("SM_ENV")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sm with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

// ── Helpers ─────────────────────────────────────────────────────────

const CONFIG: &str = "\
development:
  dialect: duckdb
  datasource: app.duckdb
  dir: migrations
other:
  dialect: duckdb
  datasource: other.duckdb
  dir: migrations
  table: schema_history
";

/// Project directory with a config and three migrations.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dbconfig.yml"), CONFIG).unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    fs::write(
        migrations.join("1_people.sql"),
        "-- +migrate Up\nCREATE TABLE people (id INTEGER);\n\n-- +migrate Down\nDROP TABLE people;\n",
    )
    .unwrap();
    fs::write(
        migrations.join("2_pets.sql"),
        "-- +migrate Up\nCREATE TABLE pets (id INTEGER);\n\n-- +migrate Down\nDROP TABLE pets;\n",
    )
    .unwrap();
    fs::write(
        migrations.join("3_toys.sql"),
        "-- +migrate Up\nCREATE TABLE toys (id INTEGER);\n\n-- +migrate Down\nDROP TABLE toys;\n",
    )
    .unwrap();
    dir
}

fn status_json(dir: &Path, extra: &[&str]) -> Vec<serde_json::Value> {
    let mut args = vec!["status", "--output", "json"];
    args.extend_from_slice(extra);
    let (stdout, stderr, ok) = run_sm(dir, &args);
    assert!(ok, "status failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

fn applied(rows: &[serde_json::Value]) -> Vec<String> {
    rows.iter()
        .filter(|r| !r["applied_at"].is_null())
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

// ── up / down ───────────────────────────────────────────────────────

#[test]
fn test_up_applies_all() {
    let dir = project();
    let (stdout, stderr, ok) = run_sm(dir.path(), &["up"]);
    assert!(ok, "up failed: {stderr}");
    assert!(stdout.contains("Applied 3 migrations"), "stdout: {stdout}");

    let rows = status_json(dir.path(), &[]);
    assert_eq!(applied(&rows), vec!["1_people.sql", "2_pets.sql", "3_toys.sql"]);
}

#[test]
fn test_up_twice_is_noop() {
    let dir = project();
    assert!(run_sm(dir.path(), &["up"]).2);
    let (stdout, _, ok) = run_sm(dir.path(), &["up"]);
    assert!(ok);
    assert!(stdout.contains("Applied 0 migrations"), "stdout: {stdout}");
}

#[test]
fn test_up_limit_and_down_default() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["up", "--limit", "2"]);
    assert!(ok);
    assert!(stdout.contains("Applied 2 migrations"), "stdout: {stdout}");

    let (stdout, _, ok) = run_sm(dir.path(), &["down"]);
    assert!(ok);
    assert!(stdout.contains("Rolled back 1 migration"), "stdout: {stdout}");

    let rows = status_json(dir.path(), &[]);
    assert_eq!(applied(&rows), vec!["1_people.sql"]);
}

#[test]
fn test_up_to_version() {
    let dir = project();
    let (_, stderr, ok) = run_sm(dir.path(), &["up", "--version", "2"]);
    assert!(ok, "up failed: {stderr}");

    let rows = status_json(dir.path(), &[]);
    assert_eq!(applied(&rows), vec!["1_people.sql", "2_pets.sql"]);
}

#[test]
fn test_negative_version_rejected() {
    let dir = project();
    let (_, stderr, ok) = run_sm(dir.path(), &["up", "--version", "-1"]);
    assert!(!ok);
    assert!(stderr.contains("P004"), "stderr: {stderr}");
}

#[test]
fn test_dryrun_prints_plan_without_applying() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["up", "--dryrun"]);
    assert!(ok);
    assert!(stdout.contains("Would apply migration 1_people.sql (up)"));
    assert!(stdout.contains("CREATE TABLE people (id INTEGER);"));
    assert!(stdout.contains("Would apply migration 3_toys.sql (up)"));

    let rows = status_json(dir.path(), &[]);
    assert!(applied(&rows).is_empty());
}

#[test]
fn test_down_dryrun_on_empty_history() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["down", "--dryrun"]);
    assert!(ok);
    assert!(stdout.contains("Nothing to do!"));
}

#[test]
fn test_failing_migration_reports_error() {
    let dir = project();
    fs::write(
        dir.path().join("migrations/4_broken.sql"),
        "-- +migrate Up\nTHIS IS NOT SQL;\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_sm(dir.path(), &["up"]);
    assert!(!ok);
    assert!(stderr.contains("stopped after 3 applied step(s)"), "stderr: {stderr}");
    assert!(stderr.contains("4_broken.sql"), "stderr: {stderr}");

    let rows = status_json(dir.path(), &[]);
    assert_eq!(applied(&rows).len(), 3);
}

// ── redo / skip ─────────────────────────────────────────────────────

#[test]
fn test_redo_reapplies_last() {
    let dir = project();
    assert!(run_sm(dir.path(), &["up"]).2);

    let (stdout, stderr, ok) = run_sm(dir.path(), &["redo"]);
    assert!(ok, "redo failed: {stderr}");
    assert!(stdout.contains("Reapplied migration 3_toys.sql"), "stdout: {stdout}");

    let rows = status_json(dir.path(), &[]);
    assert_eq!(applied(&rows).len(), 3);
}

#[test]
fn test_redo_dryrun_shows_both_directions() {
    let dir = project();
    assert!(run_sm(dir.path(), &["up", "--limit", "1"]).2);

    let (stdout, _, ok) = run_sm(dir.path(), &["redo", "--dryrun"]);
    assert!(ok);
    assert!(stdout.contains("Would apply migration 1_people.sql (down)"));
    assert!(stdout.contains("Would apply migration 1_people.sql (up)"));
}

#[test]
fn test_redo_with_nothing_applied() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["redo"]);
    assert!(ok);
    assert!(stdout.contains("Nothing to do!"));
}

#[test]
fn test_skip_marks_without_running() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["skip", "--limit", "1"]);
    assert!(ok);
    assert!(stdout.contains("Skipped 1 migration"), "stdout: {stdout}");

    // 1_people.sql never ran, so rolling it back fails on DROP TABLE.
    let (_, stderr, ok) = run_sm(dir.path(), &["down"]);
    assert!(!ok);
    assert!(stderr.contains("1_people.sql"), "stderr: {stderr}");
}

// ── status ──────────────────────────────────────────────────────────

#[test]
fn test_status_table() {
    let dir = project();
    assert!(run_sm(dir.path(), &["up", "--limit", "1"]).2);

    let (stdout, _, ok) = run_sm(dir.path(), &["status"]);
    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("MIGRATION"));
    assert!(lines[2].starts_with("1_people.sql"));
    assert!(lines[2].ends_with("UTC"));
    assert!(lines[3].starts_with("2_pets.sql"));
    assert!(lines[3].ends_with("no"));
}

#[test]
fn test_environment_selects_table_and_database() {
    let dir = project();
    assert!(run_sm(dir.path(), &["up", "--env", "other"]).2);

    assert_eq!(applied(&status_json(dir.path(), &["--env", "other"])).len(), 3);
    assert!(applied(&status_json(dir.path(), &[])).is_empty());
    assert!(dir.path().join("other.duckdb").exists());
}

// ── config errors ───────────────────────────────────────────────────

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, ok) = run_sm(dir.path(), &["status"]);
    assert!(!ok);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
}

#[test]
fn test_unknown_environment_fails() {
    let dir = project();
    let (_, stderr, ok) = run_sm(dir.path(), &["status", "--env", "production"]);
    assert!(!ok);
    assert!(stderr.contains("production"), "stderr: {stderr}");
}

#[test]
fn test_unknown_dialect_fails() {
    let dir = project();
    fs::write(
        dir.path().join("dbconfig.yml"),
        "development:\n  dialect: db2\n  datasource: app.duckdb\n",
    )
    .unwrap();
    let (_, stderr, ok) = run_sm(dir.path(), &["up"]);
    assert!(!ok);
    assert!(stderr.contains("db2"), "stderr: {stderr}");
}

#[test]
fn test_dialect_without_bundled_backend_fails() {
    let dir = project();
    let datasource = "host=db.internal user=app dbname=app";
    fs::write(
        dir.path().join("dbconfig.yml"),
        format!("development:\n  dialect: postgres\n  datasource: {datasource}\n"),
    )
    .unwrap();

    let (stdout, stderr, ok) = run_sm(dir.path(), &["up"]);
    assert!(!ok, "stdout: {stdout}");
    assert!(
        stderr.contains("dialect 'postgres' requires a postgres backend"),
        "stderr: {stderr}"
    );
    assert!(!stdout.contains("Applied"));
    assert!(!dir.path().join(datasource).exists());
}

#[test]
fn test_status_with_mssql_dialect_fails_before_opening() {
    let dir = project();
    fs::write(
        dir.path().join("dbconfig.yml"),
        "development:\n  dialect: mssql\n  datasource: app.duckdb\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_sm(dir.path(), &["status"]);
    assert!(!ok);
    assert!(stderr.contains("only duckdb is bundled"), "stderr: {stderr}");
    assert!(!dir.path().join("app.duckdb").exists());
}

#[test]
fn test_config_in_other_directory() {
    let dir = project();
    let elsewhere = TempDir::new().unwrap();
    let config = dir.path().join("dbconfig.yml");
    let (_, stderr, ok) = run_sm(
        elsewhere.path(),
        &["up", "--config", config.to_str().unwrap()],
    );
    assert!(ok, "up failed: {stderr}");
    // Migrations resolve next to the config; the datasource is relative to cwd.
    assert!(elsewhere.path().join("app.duckdb").exists());
}

// ── new ─────────────────────────────────────────────────────────────

#[test]
fn test_new_creates_skeleton() {
    let dir = project();
    let (stdout, _, ok) = run_sm(dir.path(), &["new", "add_owners"]);
    assert!(ok);
    assert!(stdout.contains("Created migration"));

    let created: Vec<_> = fs::read_dir(dir.path().join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with("-add_owners.sql"))
        .collect();
    assert_eq!(created.len(), 1);
    let stamp = created[0].trim_end_matches("-add_owners.sql");
    assert_eq!(stamp.len(), 14);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));

    let text = fs::read_to_string(dir.path().join("migrations").join(&created[0])).unwrap();
    assert_eq!(text, "-- +migrate Up\n\n-- +migrate Down\n");
}

#[test]
fn test_new_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dbconfig.yml"), CONFIG).unwrap();
    let (_, stderr, ok) = run_sm(dir.path(), &["new", "init"]);
    assert!(ok, "new failed: {stderr}");
    assert!(dir.path().join("migrations").is_dir());
}

#[test]
fn test_new_rejects_path_in_name() {
    let dir = project();
    let (_, stderr, ok) = run_sm(dir.path(), &["new", "../escape"]);
    assert!(!ok);
    assert!(stderr.contains("path separators"), "stderr: {stderr}");
}
