//! Shared application state.
//!
//! One registry and one room table are constructed at startup and
//! passed by handle everywhere; no component reaches for globals.

use std::collections::HashMap;
use std::sync::Arc;

use silk_core::{Result, RoomId};
use silk_agents::{build_refiner, GestureRefiner};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::registry::{RegistryConfig, SessionRegistry};
use crate::room::{spawn_room, RoomHandle};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    registry: Arc<SessionRegistry>,
    refiner: Arc<dyn GestureRefiner>,
    rooms: RwLock<HashMap<String, RoomHandle>>,
}

impl AppState {
    /// Build state with the refiner implied by the configured
    /// capability. Fails at startup when the capability needs wiring
    /// that was not provided.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let refiner = build_refiner(config.agents.capability, None)?;
        Ok(Self::with_refiner(config, refiner))
    }

    /// Build state around an externally wired refiner (the enriched
    /// capability path for embedders).
    pub fn with_refiner(config: ServerConfig, refiner: Arc<dyn GestureRefiner>) -> Self {
        let registry = Arc::new(SessionRegistry::new(RegistryConfig::from(&config.stream)));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                refiner,
                rooms: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.inner.registry.clone()
    }

    /// Handle for a named room, spawning its pipeline on first use.
    pub async fn room(&self, name: &str) -> RoomHandle {
        {
            let rooms = self.inner.rooms.read().await;
            if let Some(handle) = rooms.get(name) {
                return handle.clone();
            }
        }

        let mut rooms = self.inner.rooms.write().await;
        // Re-check: another caller may have spawned it between locks.
        if let Some(handle) = rooms.get(name) {
            return handle.clone();
        }

        let handle = spawn_room(
            RoomId::new(name),
            &self.inner.config.room,
            self.inner.registry.clone(),
            self.inner.refiner.clone(),
        );
        rooms.insert(name.to_string(), handle.clone());
        handle
    }

    pub async fn default_room(&self) -> RoomHandle {
        let name = self.inner.config.room.default_room.clone();
        self.room(&name).await
    }
}
