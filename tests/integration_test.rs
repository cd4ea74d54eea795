use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn regtracker_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_regtracker"));
    cmd.current_dir(dir)
        .env_remove("DATABASE_URL")
        .env_remove("REGTRACKER_DB")
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    regtracker_cmd(dir).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn init_seeded() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["init"]);
    assert!(output.status.success(), "init failed: {}", stderr(&output));
    tmp
}

fn list_json(dir: &Path, args: &[&str]) -> Vec<serde_json::Value> {
    let mut full = vec!["list", "--json"];
    full.extend_from_slice(args);
    let output = run(dir, &full);
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    parsed.as_array().unwrap().clone()
}

fn show_json(dir: &Path, id: &str) -> serde_json::Value {
    let output = run(dir, &["show", id, "--json"]);
    assert!(output.status.success(), "show failed: {}", stderr(&output));
    serde_json::from_str(&stdout(&output)).unwrap()
}

#[test]
fn test_init_creates_database() {
    let tmp = init_seeded();
    assert!(tmp.path().join("regtracker.db").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Already initialized"));
}

#[test]
fn test_list_without_init_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("regtracker init"));
}

#[test]
fn test_db_flag_selects_database() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--db", "data/custom.db", "init", "--no-seed"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(tmp.path().join("data/custom.db").exists());

    let output = run(tmp.path(), &["--db", "data/custom.db", "list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No regulations found."));
}

#[test]
fn test_config_file_selects_database() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("regtracker.yaml"), "database: from_config.db\n").unwrap();

    let output = run(tmp.path(), &["init"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(tmp.path().join("from_config.db").exists());
}

#[test]
fn test_list_all_in_load_order() {
    let tmp = init_seeded();
    let regs = list_json(tmp.path(), &[]);
    let ids: Vec<i64> = regs.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let output = run(tmp.path(), &["list"]);
    let text = stdout(&output);
    assert!(text.contains("#1 — EU MRV 2025 Amendments"));
    assert!(text.contains("[In Progress]"));
}

#[test]
fn test_list_filters() {
    let tmp = init_seeded();

    let eu = list_json(tmp.path(), &["--source", "EU"]);
    assert_eq!(eu.len(), 1);
    assert_eq!(eu[0]["id"], 1);

    assert!(list_json(tmp.path(), &["--source", "eu"]).is_empty());
    assert_eq!(list_json(tmp.path(), &["--source", "All"]).len(), 3);

    let open = list_json(tmp.path(), &["--status", "Open"]);
    assert_eq!(open.len(), 2);

    let query = list_json(tmp.path(), &["--query", "RETROFITS"]);
    assert_eq!(query.len(), 1);
    assert_eq!(query[0]["source"], "IMO");

    let combined = list_json(tmp.path(), &["-q", "usa", "--category", "Technical"]);
    assert!(combined.is_empty());
}

#[test]
fn test_show_orders_actions() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["action", "add", "1", "Undated review"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let detail = show_json(tmp.path(), "1");
    let titles: Vec<&str> = detail["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Update data pipeline for CH₄",
            "Crew circular MRV changes",
            "Undated review"
        ]
    );

    let output = run(tmp.path(), &["show", "1"]);
    let text = stdout(&output);
    assert!(text.contains("EU · EU · Effective 2025-01-01"));
    assert!(text.contains("EUR-Lex: MRV 2025"));
    assert!(text.contains("[official]"));
}

#[test]
fn test_show_missing_regulation() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["show", "99"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Regulation not found: 99"));
}

#[test]
fn test_status_change() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["status", "2", "closed"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Regulation #2 status: Closed"));

    let closed = list_json(tmp.path(), &["--status", "Closed"]);
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["id"], 2);
}

#[test]
fn test_invalid_status_is_rejected() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["status", "1", "Done"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid status 'Done'"));

    let detail = show_json(tmp.path(), "1");
    assert_eq!(detail["regulation"]["status"], "In Progress");
}

#[test]
fn test_add_action_defaults() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["action", "add", "2", "Assess retrofit", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let action: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(action["regulation_id"], 2);
    assert_eq!(action["status"], "Planned");
    assert!(action["completed_at"].is_null());
}

#[test]
fn test_add_action_rejects_empty_title() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["action", "add", "2", ""]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Title is required"));
}

#[test]
fn test_add_action_rejects_bad_due_date() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["action", "add", "2", "Task", "--due", "tomorrow"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid date 'tomorrow'"));
}

#[test]
fn test_edit_action_completion_lifecycle() {
    let tmp = init_seeded();

    let output = run(tmp.path(), &["action", "edit", "3", "--done", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let done: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(done["status"], "Done");
    assert!(done["completed_at"].is_string());
    assert_eq!(done["title"], "Assess retrofit feasibility");

    let output = run(
        tmp.path(),
        &["action", "edit", "3", "--status", "blocked", "--clear-due", "--json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let blocked: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(blocked["status"], "Blocked");
    assert!(blocked["completed_at"].is_null());
    assert!(blocked["due_date"].is_null());
}

#[test]
fn test_edit_action_invalid_status_keeps_state() {
    let tmp = init_seeded();
    let output = run(
        tmp.path(),
        &["action", "edit", "1", "--title", "Renamed", "--status", "Closed"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid status"));

    let detail = show_json(tmp.path(), "1");
    assert_eq!(detail["actions"][0]["title"], "Update data pipeline for CH₄");
}

#[test]
fn test_delete_action_requires_force_when_piped() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["action", "delete", "2"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--force"));

    let output = run(tmp.path(), &["action", "delete", "2", "--force"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Deleted action [2]"));

    let detail = show_json(tmp.path(), "1");
    let actions = detail["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 1);
    assert!(actions.iter().all(|a| a["id"] != 2));

    let output = run(tmp.path(), &["action", "delete", "2", "--force"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Action not found: 2"));
}

#[test]
fn test_choices() {
    let tmp = init_seeded();
    let output = run(tmp.path(), &["choices", "--json"]);
    assert!(output.status.success());

    let choices: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(choices["sources"], serde_json::json!(["EU", "IMO", "USCG"]));
    assert_eq!(
        choices["statuses"],
        serde_json::json!(["Open", "In Progress", "Closed"])
    );
    assert_eq!(
        choices["categories"],
        serde_json::json!(["Environmental", "Navigation", "Technical"])
    );
}
