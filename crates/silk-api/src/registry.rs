//! Session registry: the single authority over live viewer connections.
//!
//! ## Session lifecycle
//!
//! ```text
//! Connecting ──handshake──► Active ──disconnect / send failure──► Closing ──► Closed
//! ```
//!
//! An entry is created on connect and removed once closed; a removed
//! session is never resurrected. Connect and disconnect may race from
//! different tasks, so the connection set lives behind one `RwLock`;
//! broadcast iterates a point-in-time snapshot of that set, never the
//! live map.

use std::collections::HashMap;
use std::time::Duration;

use silk_core::{SessionId, Timestamp, VisualState};
use tokio::sync::{mpsc, RwLock};

use crate::config::StreamConfig;
use crate::messages::ServerMessage;

/// Per-session connection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

struct SessionHandle {
    state: SessionState,
    sender: mpsc::Sender<ServerMessage>,
    connected_at: Timestamp,
}

/// Registry configuration derived from the stream settings
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub send_timeout: Duration,
}

impl From<&StreamConfig> for RegistryConfig {
    fn from(stream: &StreamConfig) -> Self {
        Self {
            send_timeout: stream.send_timeout(),
        }
    }
}

/// Owner of the live connection set
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    config: RegistryConfig,
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Insert a new session in `Connecting` state and return its id.
    pub async fn register(&self, sender: mpsc::Sender<ServerMessage>) -> SessionId {
        let id = SessionId::new();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id,
            SessionHandle {
                state: SessionState::Connecting,
                sender,
                connected_at: Timestamp::now(),
            },
        );
        id
    }

    /// Complete the handshake: `Connecting → Active`.
    ///
    /// Returns false when the session is unknown or not connecting, so a
    /// session already torn down cannot come back.
    pub async fn activate(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(handle) if handle.state == SessionState::Connecting => {
                handle.state = SessionState::Active;
                true
            }
            _ => false,
        }
    }

    /// Move a session out of the broadcast set: `* → Closing`.
    pub async fn begin_close(&self, id: SessionId) {
        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get_mut(&id) {
            if handle.state != SessionState::Closed {
                handle.state = SessionState::Closing;
            }
        }
    }

    /// Release the session entry: `Closing → Closed`, entry removed.
    ///
    /// Dropping the registry's sender clone lets the session's outbound
    /// forwarder drain and exit.
    pub async fn finalize(&self, id: SessionId) {
        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.remove(&id) {
            let uptime = Timestamp::now().as_secs_f64() - handle.connected_at.as_secs_f64();
            tracing::debug!(session = %id, uptime_secs = uptime, "session closed");
        }
    }

    /// Disconnect path: close and release in one step.
    pub async fn remove(&self, id: SessionId) {
        self.begin_close(id).await;
        self.finalize(id).await;
    }

    pub async fn state_of(&self, id: SessionId) -> Option<SessionState> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(|h| h.state)
    }

    pub async fn active_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|h| h.state == SessionState::Active)
            .count()
    }

    /// Fan the current room state out to every Active session.
    ///
    /// The state is serialized into one message; each enqueue is
    /// independent and bounded by the send timeout. A viewer that cannot
    /// accept the message in time, or whose channel is gone, is moved to
    /// `Closing` and released; the failure never propagates to other
    /// viewers. Returns the number of successful deliveries.
    pub async fn broadcast(&self, state: &VisualState) -> usize {
        let targets: Vec<(SessionId, mpsc::Sender<ServerMessage>)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .filter(|(_, h)| h.state == SessionState::Active)
                .map(|(id, h)| (*id, h.sender.clone()))
                .collect()
        };

        if targets.is_empty() {
            return 0;
        }

        let message = ServerMessage::StateSync(state.clone());
        let timeout = self.config.send_timeout;

        let sends = targets.into_iter().map(|(id, sender)| {
            let message = message.clone();
            async move {
                match tokio::time::timeout(timeout, sender.send(message)).await {
                    Ok(Ok(())) => (id, true),
                    Ok(Err(_)) | Err(_) => (id, false),
                }
            }
        });

        let results = futures_util::future::join_all(sends).await;

        let mut delivered = 0;
        for (id, ok) in results {
            if ok {
                delivered += 1;
            } else {
                tracing::warn!(session = %id, "viewer unreachable, closing session");
                self.remove(id).await;
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(RegistryConfig {
            send_timeout: Duration::from_millis(50),
        })
    }

    #[tokio::test]
    async fn test_lifecycle_states() {
        let registry = registry();
        let (tx, _rx) = mpsc::channel(4);

        let id = registry.register(tx).await;
        assert_eq!(registry.state_of(id).await, Some(SessionState::Connecting));

        assert!(registry.activate(id).await);
        assert_eq!(registry.state_of(id).await, Some(SessionState::Active));

        registry.begin_close(id).await;
        assert_eq!(registry.state_of(id).await, Some(SessionState::Closing));

        registry.finalize(id).await;
        assert_eq!(registry.state_of(id).await, None);
    }

    #[tokio::test]
    async fn test_closed_sessions_never_resurrect() {
        let registry = registry();
        let (tx, _rx) = mpsc::channel(4);

        let id = registry.register(tx).await;
        registry.remove(id).await;

        assert!(!registry.activate(id).await);
        assert_eq!(registry.state_of(id).await, None);
    }

    #[tokio::test]
    async fn test_broadcast_skips_connecting_sessions() {
        let registry = registry();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, _rx_b) = mpsc::channel(4);

        let a = registry.register(tx_a).await;
        registry.activate(a).await;
        // b never completes its handshake.
        let _b = registry.register(tx_b).await;

        let delivered = registry.broadcast(&VisualState::initial()).await;
        assert_eq!(delivered, 1);
        assert!(matches!(
            rx_a.recv().await,
            Some(ServerMessage::StateSync(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_removes_dead_viewer() {
        let registry = registry();
        let (tx_a, rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);

        let a = registry.register(tx_a).await;
        let b = registry.register(tx_b).await;
        registry.activate(a).await;
        registry.activate(b).await;

        // Sever viewer A.
        drop(rx_a);

        let delivered = registry.broadcast(&VisualState::initial()).await;
        assert_eq!(delivered, 1);
        assert_eq!(registry.state_of(a).await, None);
        assert_eq!(registry.active_count().await, 1);

        // B is unaffected.
        assert!(matches!(
            rx_b.recv().await,
            Some(ServerMessage::StateSync(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_times_out_full_queue() {
        let registry = registry();
        let (tx, _rx) = mpsc::channel(1);

        let id = registry.register(tx.clone()).await;
        registry.activate(id).await;

        // Fill the queue so the broadcast enqueue cannot complete.
        tx.send(ServerMessage::ack()).await.unwrap();

        let delivered = registry.broadcast(&VisualState::initial()).await;
        assert_eq!(delivered, 0);
        assert_eq!(registry.state_of(id).await, None);
    }
}
