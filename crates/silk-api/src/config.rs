//! Server configuration.

use serde::{Deserialize, Serialize};
use silk_agents::PipelineCapability;
use std::net::SocketAddr;
use std::time::Duration;

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server configuration
    pub http: HttpConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Per-viewer streaming configuration
    pub stream: StreamConfig,

    /// Room pipeline configuration
    pub room: RoomSettings,

    /// Refinement capability configuration
    pub agents: AgentSettings,

    /// Log level filter (overridable via RUST_LOG)
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub bind_addr: SocketAddr,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; "*" allows any
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Outbound queue depth per viewer; bounds broadcast staleness
    pub queue_capacity: usize,

    /// Enqueue timeout per viewer before the session counts as failed (ms)
    pub send_timeout_ms: u64,

    /// Grace period for in-flight sends when a session closes (ms)
    pub close_grace_ms: u64,
}

impl StreamConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn close_grace(&self) -> Duration {
        Duration::from_millis(self.close_grace_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSettings {
    /// Control-frame queue depth per room
    pub command_queue_capacity: usize,

    /// Room joined by viewers that name none
    pub default_room: String,

    /// Nominal input frame rate the smoother constants are tuned for
    pub frame_rate_hz: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Refinement capability, fixed at startup
    pub capability: PipelineCapability,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                bind_addr: "0.0.0.0:8001".parse().unwrap(),
                timeout_secs: 30,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
            stream: StreamConfig {
                queue_capacity: 32,
                send_timeout_ms: 250,
                close_grace_ms: 500,
            },
            room: RoomSettings {
                command_queue_capacity: 256,
                default_room: "main".to_string(),
                frame_rate_hz: 60.0,
            },
            agents: AgentSettings {
                capability: PipelineCapability::Deterministic,
            },
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional file plus `SILKFLOW_*`
    /// environment overrides, falling back to defaults for anything
    /// unset.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&ServerConfig::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SILKFLOW").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&ServerConfig::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::Environment::with_prefix("SILKFLOW").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
