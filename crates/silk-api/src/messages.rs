//! Wire messages for the viewer streaming channel.

use serde::{Deserialize, Serialize};
use silk_core::{Direction2D, GestureKind, LandmarkFrame, VisualState};
use silk_effects::ColorRequest;

/// Messages pushed from the gateway to a viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Current room state, sent once right after the handshake
    InitSync(VisualState),
    /// Room state after an applied control frame
    StateSync(VisualState),
    /// Acknowledgment of one inbound message
    Ack(AckBody),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckBody {
    pub message: String,
}

impl ServerMessage {
    pub fn ack() -> Self {
        ServerMessage::Ack(AckBody {
            message: "received".to_string(),
        })
    }
}

/// Recognized control messages from a producer connection.
///
/// Anything that fails to parse is treated as an opaque control message:
/// acknowledged, then dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// A hand-tracking frame to push through the pipeline
    Frame(LandmarkFrame),
    /// A direct particle-state update
    Particle(ParticleUpdate),
    /// A color change request
    Color(ColorRequest),
}

/// Control-plane particle update, mirroring the REST surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleUpdate {
    pub gesture: GestureKind,
    pub intensity: f64,
    #[serde(default)]
    pub direction: Direction2D,
}
