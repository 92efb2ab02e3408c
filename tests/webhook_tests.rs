#![cfg(feature = "webhook")]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wbs_hub::{
    ConfigError, ExpandedTask, HubConfig, SubmissionPayload, WebhookClient, WebhookError,
};

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

async fn receive(State(hits): State<Hits>, Json(body): Json<serde_json::Value>) -> StatusCode {
    hits.0.fetch_add(1, Ordering::SeqCst);
    let label = body
        .get("tarefa")
        .or_else(|| body.get("pending_id"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if label.contains("falha") {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn spawn_server() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/hook", post(receive))
        .with_state(hits.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/hook"), hits)
}

fn task(label: &str) -> ExpandedTask {
    ExpandedTask {
        tarefa: label.to_string(),
        projeto: "01058".into(),
        wbs_type: "eletrico".into(),
        categoria: None,
    }
}

fn client(endpoint: &str) -> WebhookClient {
    WebhookClient::new(endpoint, Duration::from_secs(5), Duration::ZERO).unwrap()
}

#[tokio::test]
async fn all_tasks_delivered() {
    let (endpoint, hits) = spawn_server().await;
    let tasks = vec![task("A"), task("B"), task("C")];

    let mut progress = Vec::new();
    let report = client(&endpoint).send_tasks(&tasks, |p| progress.push(p)).await;

    assert!(report.ok);
    assert_eq!(report.message, "3 tarefas criadas com sucesso!");
    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| r.ok && r.status == Some(200)));
    assert_eq!(hits.0.load(Ordering::SeqCst), 3);
    assert_eq!(progress.len(), 3);
    assert_eq!(progress.last().copied(), Some(1.0));
}

#[tokio::test]
async fn failures_are_collected_without_aborting() {
    let (endpoint, hits) = spawn_server().await;
    let tasks = vec![task("A"), task("B falha"), task("C")];

    let report = client(&endpoint).send_tasks(&tasks, |_| {}).await;

    assert!(!report.ok);
    assert_eq!(hits.0.load(Ordering::SeqCst), 3);
    assert!(report.message.starts_with("Erros em 1 tarefas:"));
    assert!(report.message.contains("B falha: HTTP 500"));
    assert_eq!(report.results[1].status, Some(500));
    assert!(!report.results[1].ok);
    assert!(report.results[2].ok);
}

#[tokio::test]
async fn unreachable_endpoint_has_no_status() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let report = client(&format!("http://{addr}/hook"))
        .send_tasks(&[task("A")], |_| {})
        .await;
    assert!(!report.ok);
    assert_eq!(report.results[0].status, None);
    assert!(report.message.starts_with("Erros em 1 tarefas:"));
}

#[tokio::test]
async fn empty_task_list_is_a_success() {
    let (endpoint, hits) = spawn_server().await;
    let report = client(&endpoint).send_tasks(&[], |_| {}).await;
    assert!(report.ok);
    assert_eq!(report.message, "0 tarefas criadas com sucesso!");
    assert_eq!(hits.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn payload_rejection_surfaces_status() {
    let (endpoint, hits) = spawn_server().await;
    let mut payload = SubmissionPayload {
        pending_id: "PEND-1".into(),
        os: "01058".into(),
        subconjunto: "Base".into(),
        tasks_genericas: Vec::new(),
        wbs: vec![task("A")],
    };
    client(&endpoint).send_payload(&payload).await.unwrap();

    payload.pending_id = "PEND-falha".into();
    let err = client(&endpoint).send_payload(&payload).await.unwrap_err();
    assert!(matches!(err, WebhookError::Rejected { status: 500 }));
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[test]
fn blank_or_placeholder_endpoint_is_not_configured() {
    assert!(matches!(
        WebhookClient::new("  ", Duration::from_secs(1), Duration::ZERO),
        Err(WebhookError::NotConfigured)
    ));
    assert!(matches!(
        WebhookClient::from_config(&HubConfig::default()),
        Err(WebhookError::NotConfigured)
    ));

    let config = HubConfig {
        make_endpoint: "http://127.0.0.1:9/hook".into(),
        ..HubConfig::default()
    };
    let client = WebhookClient::from_config(&config).unwrap();
    assert_eq!(client.endpoint(), "http://127.0.0.1:9/hook");
}

#[test]
fn negative_delay_in_config_is_rejected() {
    let config = HubConfig {
        make_endpoint: "http://127.0.0.1:9/hook".into(),
        request_delay: -1.0,
        ..HubConfig::default()
    };
    assert!(matches!(
        WebhookClient::from_config(&config),
        Err(WebhookError::Config(ConfigError::Invalid(_)))
    ));
}
