#![cfg(feature = "cli")]

use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use tokio::runtime::Runtime;
use wbs_hub::{JournalStatus, PlanStore, SqlitePlanStore};

fn write_config(dir: &Path) -> PathBuf {
    let templates = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates");
    let database = dir.join("db").join("planejamentos.db");
    let path = dir.join("config.yaml");
    fs::write(
        &path,
        format!(
            "templates_dir: {:?}\ndatabase_path: {:?}\nrequest_delay: 0\n",
            templates, database
        ),
    )
    .unwrap();
    path
}

fn wbs(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wbs").unwrap();
    cmd.current_dir(dir.path())
        .env("WBS_HUB_CONFIG", write_config(dir.path()))
        .env_remove("WBS_HUB_ENDPOINT");
    cmd
}

const PERCENTUAL_FLOW: &str = "\
pendencia PEND-1 01058 2024-01-01 2024-01-05 2 Estação 100
confirm
confirm
use eletrico 010 01058 - Montagem
select 1 2
confirm
";

#[test]
fn lists_bundled_templates() {
    let dir = tempdir().unwrap();
    wbs(&dir)
        .write_stdin("templates\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("eletrico"))
        .stdout(predicate::str::contains("Diagrama unifilar (2 dias)"))
        .stdout(predicate::str::contains("hardware_mecanico"));
}

#[test]
fn full_flow_is_journaled() {
    let dir = tempdir().unwrap();
    let script = format!("{PERCENTUAL_FLOW}journal\nplans\nquit\n");
    wbs(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 10 generic tasks."))
        .stdout(predicate::str::contains("01058 - Estação 100 - 10% | Dia 01/01"))
        .stdout(predicate::str::contains("Selected 1. Diagrama unifilar - 2 dias"))
        .stdout(predicate::str::contains("Preview (2 items to be created)"))
        .stdout(predicate::str::contains("010 - 1. Diagrama unifilar - 50%"))
        .stdout(predicate::str::contains("Journaled plan 1 (ok)."))
        .stdout(predicate::str::contains("PEND-1"));

    assert!(dir.path().join("db").join("planejamentos.db").exists());
}

#[test]
fn export_writes_payload_and_csv() {
    let dir = tempdir().unwrap();
    let script = format!("{PERCENTUAL_FLOW}export json payload.json\nexport csv tasks.csv\nquit\n");
    wbs(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to payload.json"))
        .stdout(predicate::str::contains("Exported to tasks.csv"));

    let payload = wbs_hub::load_payload_from_json(dir.path().join("payload.json")).unwrap();
    assert_eq!(payload.pending_id, "PEND-1");
    assert_eq!(payload.wbs.len(), 2);
    let csv = fs::read_to_string(dir.path().join("tasks.csv")).unwrap();
    assert!(csv.starts_with("tarefa,projeto,wbs_type,categoria"));
}

#[test]
fn send_requires_configured_endpoint() {
    let dir = tempdir().unwrap();
    let script = format!("{PERCENTUAL_FLOW}send\nquit\n");
    wbs(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configure the webhook endpoint (make_endpoint or WBS_HUB_ENDPOINT) before sending.",
        ))
        .stdout(predicate::str::contains("Journaled plan").not());
}

#[test]
fn empty_selection_is_reported() {
    let dir = tempdir().unwrap();
    let script = "\
pendencia PEND-1 01058 2024-01-01 2024-01-05 1 Base
confirm
confirm
use eletrico 010 Projeto
confirm
quit
";
    wbs(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: select at least one task"));
}

#[test]
fn multiplicador_flow_previews_items() {
    let dir = tempdir().unwrap();
    let script = "\
pendencia PEND-2 01058 2024-01-01 2024-01-01 1 Base
confirm
confirm
use aquisicao 020 Compras
category eletronicos
items Sensor, Relé
confirm
quit
";
    wbs(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 items set."))
        .stdout(predicate::str::contains("Preview (4 items to be created)"))
        .stdout(predicate::str::contains("020 - <Relé> - Solicitar cotação"));
}

#[test]
fn exits_on_end_of_input() {
    let dir = tempdir().unwrap();
    wbs(&dir).write_stdin("").assert().success();
}

/// Accepts every task except the ones for "Lista de materiais".
async fn board(Json(task): Json<serde_json::Value>) -> StatusCode {
    let label = task["tarefa"].as_str().unwrap_or_default();
    if label.contains("Lista de materiais") {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

fn start_board(runtime: &Runtime) -> String {
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/hook", post(board));
    runtime.spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/hook")
}

fn journaled_status(dir: &TempDir) -> (JournalStatus, Option<String>) {
    let store = SqlitePlanStore::new(dir.path().join("db").join("planejamentos.db")).unwrap();
    let plan = store.load_plan(1).unwrap().expect("plan journaled");
    (plan.status, plan.erro_msg)
}

#[test]
fn send_posts_each_task_and_journals_success() {
    let runtime = Runtime::new().unwrap();
    let endpoint = start_board(&runtime);
    let dir = tempdir().unwrap();
    let script = format!("{PERCENTUAL_FLOW}send\nquit\n");

    wbs(&dir)
        .env("WBS_HUB_ENDPOINT", &endpoint)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 50%"))
        .stdout(predicate::str::contains("Progress: 100%"))
        .stdout(predicate::str::contains("010 - 1. Diagrama unifilar - 50% (HTTP 200)"))
        .stdout(predicate::str::contains("2 tarefas criadas com sucesso!"))
        .stdout(predicate::str::contains("Journaled plan 1 (ok)."));

    assert_eq!(journaled_status(&dir), (JournalStatus::Ok, None));
}

#[test]
fn send_journals_rejected_tasks_with_the_report() {
    let runtime = Runtime::new().unwrap();
    let endpoint = start_board(&runtime);
    let dir = tempdir().unwrap();
    let script = "\
pendencia PEND-3 01058 2024-01-01 2024-01-02 1 Base
confirm
confirm
use eletrico 010 01058 - Montagem
select 1 1
select 2 1
confirm
send tasks
quit
";

    wbs(&dir)
        .env("WBS_HUB_ENDPOINT", &endpoint)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok  ] 010 - 1. Diagrama unifilar - 100% (HTTP 200)"))
        .stdout(predicate::str::contains("[erro] 010 - 2. Lista de materiais - 100% (HTTP 500)"))
        .stdout(predicate::str::contains("Erros em 1 tarefas:"))
        .stdout(predicate::str::contains("Journaled plan 1 (erro_tasks)."));

    let (status, erro_msg) = journaled_status(&dir);
    assert_eq!(status, JournalStatus::ErroTasks);
    assert!(erro_msg.unwrap().contains("2. Lista de materiais - 100%: HTTP 500"));
}

#[test]
fn send_payload_posts_once() {
    let runtime = Runtime::new().unwrap();
    let endpoint = start_board(&runtime);
    let dir = tempdir().unwrap();
    let script = format!("{PERCENTUAL_FLOW}send payload\nquit\n");

    wbs(&dir)
        .env("WBS_HUB_ENDPOINT", &endpoint)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent 2 WBS tasks and 10 generic tasks."))
        .stdout(predicate::str::contains("Journaled plan 1 (ok)."));
}
