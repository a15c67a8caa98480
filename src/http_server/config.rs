//! The `http` section of `itemstore.json`.
//!
//! Every key is optional; a missing section means a loopback listener on
//! port 8000 that any browser origin may call.

use serde::{Deserialize, Serialize};

/// Where the item API listens and which browser origins may call it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Interface to listen on (default: loopback only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 8000). `serve --port` overrides it.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty means any origin, so a local frontend
    /// can reach `/items/` without extra setup. List origins explicitly
    /// before exposing the service beyond loopback.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Defaults with a different port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port`, as passed to the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
