use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// External settings, read from `CANVAS_`-prefixed environment variables.
/// Every field has a default so a bare environment still boots.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated in the environment, e.g.
    /// `CANVAS_ALLOWED_ORIGINS=http://localhost:3001,https://canvas.example`.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Seconds a departed connection's rectangles are kept before cleanup.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3001".to_string()]
}

fn default_grace_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            grace_secs: default_grace_secs(),
        }
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("CANVAS")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn grace_window(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}
