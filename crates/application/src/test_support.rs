//! In-memory port implementations shared by unit tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use restproxy_domain::{AuthConfig, Config, RequestSpec, ResponseSpec};
use url::Url;

use crate::ports::{
    AuthError, AuthHeader, AuthHeaderProvider, Clock, FileSystem, FileSystemError, HttpClient,
    HttpClientError, Logger, OutputSink,
};

pub fn test_config() -> Config {
    Config {
        base_url: Url::parse("https://example.atlassian.net").unwrap(),
        auth: AuthConfig::basic("me@example.com", "token"),
        timeout_seconds: 30,
        max_retries: 2,
        retry_base_delay_ms: 100,
    }
}

pub fn response(status: u16, body: &str) -> ResponseSpec {
    response_with_headers(status, body, &[("Content-Type", "application/json")])
}

pub fn response_with_headers(status: u16, body: &str, headers: &[(&str, &str)]) -> ResponseSpec {
    let headers = headers
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    ResponseSpec::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(5))
}

/// Clock frozen at a fixed instant that records sleeps instead of waiting.
pub struct FakeClock {
    now: DateTime<Utc>,
    sleeps: Mutex<Vec<Duration>>,
    blocking: bool,
}

impl FakeClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            sleeps: Mutex::new(Vec::new()),
            blocking: false,
        }
    }

    /// A clock whose sleeps never finish.
    pub fn blocking() -> Self {
        Self {
            blocking: true,
            ..Self::at(Utc::now())
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        if self.blocking {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn verbose(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// HTTP client that replays a fixed script of outcomes and records every
/// request it was given.
#[derive(Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl ScriptedHttpClient {
    pub fn new(script: Vec<Result<ResponseSpec, HttpClientError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Other("script exhausted".to_string())))
    }
}

#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    async fn read_file_string(&self, path: &Path) -> Result<String, FileSystemError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Everything written, as one string with newlines between writes.
    pub fn output(&self) -> String {
        self.lines().join("\n")
    }

    /// The single write, parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        let lines = self.lines();
        assert_eq!(lines.len(), 1, "expected exactly one write, got {lines:?}");
        serde_json::from_str(&lines[0]).expect("output is not JSON")
    }
}

impl OutputSink for BufferSink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct StaticAuth;

impl AuthHeaderProvider for StaticAuth {
    fn create_auth_header(&self, _config: &Config) -> Result<AuthHeader, AuthError> {
        Ok(AuthHeader::new("Basic", "bWVAZXhhbXBsZS5jb206dG9rZW4="))
    }
}
