use std::path::PathBuf;
use std::time::Duration;

/// Relay API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Document root for non-relay paths.
    pub public_dir: PathBuf,
    /// Idle interval between SSE keep-alive comments, in seconds.
    pub keep_alive_secs: u64,
    /// Largest accepted publish body, in bytes.
    pub max_publish_bytes: usize,
    /// Payloads queued per subscriber before it is considered stalled.
    ///
    /// A publish burst deeper than this, arriving faster than the client
    /// reads, disconnects that subscriber even if it is still reading.
    pub subscriber_buffer: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; missing or unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parsed_var::<u16>("PORT").unwrap_or(defaults.port),
            public_dir: std::env::var("PUBLIC_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            keep_alive_secs: parsed_var::<u64>("KEEP_ALIVE_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.keep_alive_secs),
            max_publish_bytes: parsed_var::<usize>("MAX_PUBLISH_BYTES").unwrap_or(defaults.max_publish_bytes),
            subscriber_buffer: parsed_var::<usize>("SUBSCRIBER_BUFFER")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.subscriber_buffer),
        }
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8787,
            public_dir: PathBuf::from("public"),
            keep_alive_secs: 25,
            max_publish_bytes: 1024 * 1024,
            subscriber_buffer: 256,
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
