//! Integration tests for the HTTP trigger handlers

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use spo_exporter::adapters::database::QuerySource;
use spo_exporter::api::server::{execute, health};
use spo_exporter::api::{router, AppState};
use spo_exporter::config::{CatalogConfig, ExporterConfig};
use spo_exporter::domain::{ExporterError, Result, ResultSet};
use spo_exporter::logging::{Alerter, FailureAlert};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Returns one row for every query except the failing ones
///
/// Tracks how many fetches overlap so tests can observe serialization.
struct SlowSource {
    failing: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowSource {
    fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QuerySource for SlowSource {
    async fn fetch(&self, sql: &str) -> Result<ResultSet> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(sql) {
            return Err(ExporterError::Database("connection reset by peer".to_string()));
        }
        Ok(ResultSet::new(vec!["Name".into()], vec![vec![json!("row")]]))
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

#[derive(Default)]
struct RecordingAlerter {
    alerts: Mutex<Vec<FailureAlert>>,
}

#[async_trait]
impl Alerter for RecordingAlerter {
    async fn send(&self, alert: &FailureAlert) -> Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

fn config(dir: &TempDir) -> ExporterConfig {
    let mut config = ExporterConfig::default();
    config.export.output_root = dir.path().to_path_buf();
    config
}

#[tokio::test]
async fn test_health() {
    let body = health().await.0;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["service"], json!("spo-exporter"));
}

#[tokio::test]
async fn test_execute_success_payload() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(Arc::new(SlowSource::new(&[])), &config(&dir), None);

    let response = execute(State(state)).await.unwrap().0;
    let body = serde_json::to_value(&response).unwrap();

    assert_eq!(body["result"], json!(true));
    assert_eq!(body["summary"]["documents"][0]["name"], json!("assets.json"));
    assert_eq!(body["summary"]["documents"][1]["name"], json!("metadata.json"));
    assert!(dir.path().join("assets.json").exists());
}

#[tokio::test]
async fn test_execute_failure_payload_and_alert() {
    let dir = TempDir::new().unwrap();
    let catalog = CatalogConfig::default();
    let source = SlowSource::new(&[catalog.technologies_query.as_str()]);
    let alerter = Arc::new(RecordingAlerter::default());
    let state = AppState::new(
        Arc::new(source),
        &config(&dir),
        Some(alerter.clone() as Arc<dyn Alerter>),
    );

    let (status, body) = match execute(State(state)).await {
        Err((status, body)) => (status, body.0),
        Ok(_) => panic!("export should fail"),
    };

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::to_value(&body).unwrap();
    assert_eq!(body["result"], json!("Error"));
    assert_eq!(
        body["message"],
        json!("Query for Technologies failed: Database error: connection reset by peer")
    );
    assert_eq!(
        body["traceback"],
        json!("Database error: connection reset by peer")
    );

    let alerts = alerter.alerts.lock().unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.starts_with("Query for Technologies failed"));
}

#[tokio::test]
async fn test_concurrent_triggers_are_serialized() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(SlowSource::new(&[]));
    let state = AppState::new(source.clone(), &config(&dir), None);

    let runs: Vec<_> = (0..3)
        .map(|_| tokio::spawn(execute(State(state.clone()))))
        .collect();
    for run in runs {
        assert!(run.await.unwrap().is_ok());
    }

    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    let assets: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("assets.json")).unwrap())
            .unwrap();
    assert_eq!(assets, json!([{"Name": "row"}]));
}

#[tokio::test]
async fn test_router_mounts_trigger_under_prefix_and_namespace() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.server.url_prefix = "/litmos".to_string();
    let state = AppState::new(Arc::new(SlowSource::new(&[])), &config, None);
    let app = router(state, &config.server.execute_path());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/litmos/api/execute"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["result"], json!(true));

    let response = client
        .get(format!("http://{addr}/litmos/execute"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}
