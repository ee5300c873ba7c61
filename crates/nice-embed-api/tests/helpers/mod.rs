//! Test helpers: build AppState and router for integration tests.
//!
//! Each test app gets its own upload directory and its own fake ffprobe/ffmpeg
//! scripts, so tests run in parallel without real media binaries.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use nice_embed_api::setup::{prepare_upload_dirs, routes};
use nice_embed_api::state::AppState;
use nice_embed_core::{AppConfig, AppError};
use nice_embed_infra::Notifier;
use tempfile::TempDir;

pub const BASE_URL: &str = "https://cdn.example.com";

/// Notifier that keeps every message in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Wait until at least `count` messages arrived; notifications are sent from a spawned task.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        for _ in 0..500 {
            {
                let messages = self.messages.lock().unwrap();
                if messages.len() >= count {
                    return messages.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} notification(s)", count);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), AppError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Test application: server, recorded notifications and owned temp dirs.
pub struct TestApp {
    pub server: TestServer,
    pub notifier: Arc<RecordingNotifier>,
    pub upload_dir: TempDir,
    pub _tools_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_path(&self, relative: &str) -> PathBuf {
        self.upload_dir.path().join(relative)
    }
}

/// Builder for a test app; the defaults mimic a 422x422 video.
pub struct TestAppBuilder {
    probe_script: String,
    ffmpeg_script: String,
    env: HashMap<String, String>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            probe_script: fixtures::probe_reporting(422, 422),
            ffmpeg_script: fixtures::FFMPEG_WRITES_FRAME.to_string(),
            env: HashMap::new(),
        }
    }
}

impl TestAppBuilder {
    pub fn probe_script(mut self, script: impl Into<String>) -> Self {
        self.probe_script = script.into();
        self
    }

    pub fn ffmpeg_script(mut self, script: impl Into<String>) -> Self {
        self.ffmpeg_script = script.into();
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub async fn build(self) -> TestApp {
        let upload_dir = TempDir::new().unwrap();
        let tools_dir = TempDir::new().unwrap();

        let ffprobe = fixtures::write_script(tools_dir.path(), "ffprobe", &self.probe_script);
        let ffmpeg = fixtures::write_script(tools_dir.path(), "ffmpeg", &self.ffmpeg_script);

        let mut env = HashMap::from([
            ("BASE_URL".to_string(), format!("{}/", BASE_URL)),
            ("UPLOAD_DIR".to_string(), path_string(upload_dir.path())),
            ("WEBHOOK_URL".to_string(), "http://127.0.0.1:9/unused".to_string()),
            ("FFPROBE_PATH".to_string(), path_string(&ffprobe)),
            ("FFMPEG_PATH".to_string(), path_string(&ffmpeg)),
            ("MEDIA_TOOL_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        env.extend(self.env);

        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        prepare_upload_dirs(&config).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let state = Arc::new(AppState::new(config, notifier.clone()));
        let router = routes::setup_routes(&state.config, state.clone());

        TestApp {
            server: TestServer::new(router).unwrap(),
            notifier,
            upload_dir,
            _tools_dir: tools_dir,
        }
    }
}

/// Test app with the default fake tools.
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}

fn path_string(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}
