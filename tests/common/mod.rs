//! Common test utilities and helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::Utc;
use mdgen::config::Config;
use mdgen::{api, AppState};
use mdgen_storage::ManualClock;
use serde_json::Value;
use tempfile::TempDir;

/// An application wired to a private export directory and a manual clock.
pub struct TestApp {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(&[]).await
    }

    /// Build an app with extra config overrides.
    pub async fn with_settings(settings: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut values: HashMap<String, String> = HashMap::from([
            (
                "EXPORT_DIR".to_string(),
                dir.path().to_string_lossy().into_owned(),
            ),
            ("PUBLIC_URL".to_string(), "http://test.local".to_string()),
            ("GENERATOR_NAME".to_string(), "Test Generator".to_string()),
            ("SWEEP_ON_WRITE".to_string(), "false".to_string()),
        ]);
        for (key, value) in settings {
            values.insert(key.to_string(), value.to_string());
        }
        let config = Config::from_source(|key| values.get(key).cloned());

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = AppState::with_clock(&config, clock.clone())
            .await
            .expect("Failed to build app state");

        Self { state, clock, dir }
    }

    pub fn router(&self) -> Router {
        api::app(self.state.clone())
    }

    /// Number of files currently in the export directory.
    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .expect("Failed to read export dir")
            .count()
    }
}

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = extract_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Extract raw body bytes from response
pub async fn extract_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

/// Create a GET request
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Create a POST request with JSON body
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Strip the origin from a download URL, leaving the request path.
pub fn download_path(download_url: &str) -> String {
    download_url
        .strip_prefix("http://test.local")
        .unwrap_or(download_url)
        .to_string()
}
