use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_ws_url() -> String {
    "ws://localhost:8080".to_string()
}

/// Simplification service location
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        let endpoint = env::var("PLAINLY_ENDPOINT").unwrap_or_else(|_| default_endpoint());

        let request_timeout_secs = env::var("PLAINLY_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_request_timeout_secs);

        Self {
            endpoint,
            request_timeout_secs,
        }
    }

    pub fn simplify_url(&self) -> String {
        format!("{}/simplify", self.endpoint.trim_end_matches('/'))
    }

    pub fn feedback_url(&self) -> String {
        format!("{}/feedback", self.endpoint.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// How the page shim reaches the host
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TransportConfig {
    /// Connect to a websocket relay, if false use native messaging on stdio
    pub listen_to_ws: bool,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            listen_to_ws: false,
            ws_url: default_ws_url(),
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        let ws_url = env::var("PLAINLY_WS_URL").ok();

        Self {
            listen_to_ws: ws_url.is_some(),
            ws_url: ws_url.unwrap_or_else(default_ws_url),
        }
    }
}
