#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use tokio::time;

use relay_api::config::Config;
use relay_api::AppState;

/// Per-read timeout for event streams.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Config with defaults and an empty, unique document root.
pub fn test_config() -> Config {
    Config {
        public_dir: temp_public_dir(),
        ..Config::default()
    }
}

/// Create a fresh directory to serve static files from.
pub fn temp_public_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(relay_common::id::prefixed_ulid("relay_public"));
    std::fs::create_dir_all(&dir).expect("create public dir");
    dir
}

/// Build the full application router wired to a state built from `config`.
pub fn test_app_with(config: Config) -> (Router, AppState) {
    let state = AppState::new(config);
    let app = relay_api::routes::router().with_state(state.clone());
    (app, state)
}

pub fn test_app() -> (Router, AppState) {
    test_app_with(test_config())
}

/// Start an actual TCP server for event-stream testing.
/// The server runs in the background.
pub async fn start_server_with(config: Config) -> (SocketAddr, AppState) {
    let (app, state) = test_app_with(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

pub async fn start_server() -> (SocketAddr, AppState) {
    start_server_with(test_config()).await
}

/// POST a raw body to a room and return the status code.
pub async fn publish(addr: SocketAddr, room: &str, body: &str) -> reqwest::StatusCode {
    reqwest::Client::new()
        .post(format!("http://{addr}/live/{room}"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("publish request")
        .status()
}

/// Poll `check` until it holds or the read timeout elapses.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = time::Instant::now() + READ_TIMEOUT;
    while time::Instant::now() < deadline {
        if check() {
            return true;
        }
        time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// A subscriber connection read frame by frame.
pub struct EventStream {
    pub response: reqwest::Response,
    buffer: String,
}

impl EventStream {
    /// Open `GET /live/{room}` and consume the opening comment frame.
    pub async fn connect(addr: SocketAddr, room: &str) -> Self {
        let response = reqwest::Client::new()
            .get(format!("http://{addr}/live/{room}"))
            .send()
            .await
            .expect("subscribe request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let mut stream = Self {
            response,
            buffer: String::new(),
        };
        let opening = stream.next_frame().await;
        assert!(opening.starts_with(':'), "expected opening comment, got {opening:?}");
        stream
    }

    /// Next raw frame, without the blank-line terminator.
    pub async fn next_frame(&mut self) -> String {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame = self.buffer[..end].to_string();
                self.buffer.drain(..end + 2);
                return frame;
            }

            let chunk = time::timeout(READ_TIMEOUT, self.response.chunk())
                .await
                .expect("timeout waiting for frame")
                .expect("stream read error")
                .expect("stream ended");
            self.buffer.push_str(std::str::from_utf8(&chunk).expect("utf-8 frame"));
        }
    }

    /// Next data frame parsed as JSON, skipping comment frames.
    pub async fn next_data(&mut self) -> serde_json::Value {
        loop {
            let frame = self.next_frame().await;
            if frame.starts_with(':') {
                continue;
            }
            return parse_data_frame(&frame);
        }
    }

    /// Assert no data frame arrives within `window`.
    pub async fn assert_no_data(&mut self, window: Duration) {
        if let Ok(value) = time::timeout(window, self.next_data()).await {
            panic!("unexpected data frame: {value}");
        }
    }
}

/// Join the `data:` lines of a frame and parse them as JSON.
pub fn parse_data_frame(frame: &str) -> serde_json::Value {
    let data: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();
    assert!(!data.is_empty(), "not a data frame: {frame:?}");
    serde_json::from_str(&data.join("\n")).expect("data frame is JSON")
}
