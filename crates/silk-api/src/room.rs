//! Room pipeline: the single writer of one room's visual state.
//!
//! All control input for a room flows through one mpsc queue into one
//! worker task, so state updates are computed once per inbound frame and
//! are totally ordered. The worker owns the momentum state, the gesture
//! history, and the current `VisualState`; everything it hands out is an
//! immutable snapshot. Broadcast fan-out happens through the session
//! registry after every applied update.

use std::sync::Arc;

use silk_core::{
    ColorParams, Error, GestureKind, GestureResult, LandmarkFrame, MomentumState, ParticleParams,
    Result, RoomId, VisualState,
};
use silk_agents::{GestureHistory, GestureRefiner};
use silk_effects::{ColorMapper, ColorRequest, ParticleMapper};
use silk_gesture::{KinematicAnalyzer, MotionSmoother};
use tokio::sync::{mpsc, oneshot};

use crate::config::RoomSettings;
use crate::messages::ParticleUpdate;
use crate::registry::SessionRegistry;

/// Commands accepted by a room worker
enum RoomCommand {
    Frame {
        frame: LandmarkFrame,
        reply: Option<oneshot::Sender<Result<GestureResult>>>,
    },
    Particle {
        update: ParticleUpdate,
        reply: Option<oneshot::Sender<ParticleParams>>,
    },
    Color {
        request: ColorRequest,
        reply: Option<oneshot::Sender<ColorParams>>,
    },
    Snapshot {
        reply: oneshot::Sender<VisualState>,
    },
}

/// Cloneable handle for submitting control input to a room
#[derive(Clone)]
pub struct RoomHandle {
    id: RoomId,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Analyze a frame and apply it to the room.
    ///
    /// Invalid frames return the analyzer's error and leave room state
    /// untouched.
    pub async fn analyze(&self, frame: LandmarkFrame) -> Result<GestureResult> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Frame {
            frame,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| Self::gone())?
    }

    /// Submit a frame without waiting for the classification.
    pub async fn submit_frame(&self, frame: LandmarkFrame) -> Result<()> {
        self.send(RoomCommand::Frame { frame, reply: None }).await
    }

    pub async fn update_particle(&self, update: ParticleUpdate) -> Result<ParticleParams> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Particle {
            update,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| Self::gone())
    }

    pub async fn change_color(&self, request: ColorRequest) -> Result<ColorParams> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Color {
            request,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| Self::gone())
    }

    /// Point-in-time copy of the room's current state.
    pub async fn snapshot(&self) -> Result<VisualState> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| Self::gone())
    }

    async fn send(&self, command: RoomCommand) -> Result<()> {
        self.tx.send(command).await.map_err(|_| Self::gone())
    }

    fn gone() -> Error {
        Error::Pipeline("room worker stopped".to_string())
    }
}

/// Worker-owned pipeline state
struct RoomPipeline {
    id: RoomId,
    analyzer: KinematicAnalyzer,
    smoother: MotionSmoother,
    particle_mapper: ParticleMapper,
    color_mapper: ColorMapper,
    refiner: Arc<dyn GestureRefiner>,
    registry: Arc<SessionRegistry>,

    frame_dt: f64,
    momentum: MomentumState,
    history: GestureHistory,
    prev_frame: Option<LandmarkFrame>,
    last_gesture: GestureKind,
    sustain_frames: u32,
    current: VisualState,
}

/// Spawn a room worker and return its handle.
pub fn spawn_room(
    id: RoomId,
    settings: &RoomSettings,
    registry: Arc<SessionRegistry>,
    refiner: Arc<dyn GestureRefiner>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(settings.command_queue_capacity);

    let pipeline = RoomPipeline {
        id: id.clone(),
        analyzer: KinematicAnalyzer::default(),
        smoother: MotionSmoother::default(),
        particle_mapper: ParticleMapper::default(),
        color_mapper: ColorMapper::new(),
        refiner,
        registry,
        frame_dt: 1.0 / settings.frame_rate_hz.max(1.0),
        momentum: MomentumState::zero(),
        history: GestureHistory::default(),
        prev_frame: None,
        last_gesture: GestureKind::Idle,
        sustain_frames: 0,
        current: VisualState::initial(),
    };

    tokio::spawn(pipeline.run(rx));

    RoomHandle { id, tx }
}

impl RoomPipeline {
    async fn run(mut self, mut rx: mpsc::Receiver<RoomCommand>) {
        tracing::info!(room = %self.id, "room pipeline started");

        while let Some(command) = rx.recv().await {
            match command {
                RoomCommand::Frame { frame, reply } => {
                    match self.apply_frame(frame).await {
                        Ok(result) => {
                            if let Some(reply) = reply {
                                let _ = reply.send(Ok(result));
                            }
                            self.broadcast().await;
                        }
                        Err(e) => {
                            // Nothing was mutated; viewers keep the prior state.
                            match reply {
                                Some(reply) => {
                                    let _ = reply.send(Err(e));
                                }
                                None => {
                                    tracing::warn!(room = %self.id, error = %e, "dropped invalid frame");
                                }
                            }
                        }
                    }
                }
                RoomCommand::Particle { update, reply } => {
                    let params = self.apply_particle(update);
                    if let Some(reply) = reply {
                        let _ = reply.send(params);
                    }
                    self.broadcast().await;
                }
                RoomCommand::Color { request, reply } => {
                    let params = self.apply_color(&request);
                    if let Some(reply) = reply {
                        let _ = reply.send(params);
                    }
                    self.broadcast().await;
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.current.clone());
                }
            }
        }

        tracing::info!(room = %self.id, "room pipeline stopped");
    }

    /// Run one landmark frame through analyze → refine → smooth → map.
    async fn apply_frame(&mut self, frame: LandmarkFrame) -> Result<GestureResult> {
        let result = self.analyzer.analyze(&frame, self.prev_frame.as_ref())?;

        // Refinement may only sharpen the result; its failure is
        // contained here and never stalls the room.
        let refined = match self.refiner.refine(result, &self.history).await {
            Ok(refined) => refined,
            Err(e) => {
                tracing::warn!(room = %self.id, error = %e, "refiner failed, using raw result");
                result
            }
        };

        self.history.push(refined.gesture);
        self.advance(refined);
        self.prev_frame = Some(frame);

        Ok(refined)
    }

    /// Apply a direct control-plane particle update as a synthetic
    /// gesture result. Intensity is clamped by construction.
    fn apply_particle(&mut self, update: ParticleUpdate) -> ParticleParams {
        let synthetic = GestureResult::new(
            update.gesture,
            update.intensity,
            update.direction,
            1.0,
            update.gesture,
        );

        self.history.push(synthetic.gesture);
        self.advance(synthetic);

        self.current.particle
    }

    fn apply_color(&mut self, request: &ColorRequest) -> ColorParams {
        let color = self.color_mapper.resolve(request);
        self.current.seq += 1;
        self.current.color = color;
        color
    }

    /// Fold one refined result into momentum and the visual state.
    ///
    /// Non-finite mapper output (a pipeline failure) rolls the momentum
    /// back and keeps the previous valid state, which the caller then
    /// re-broadcasts.
    fn advance(&mut self, refined: GestureResult) {
        if refined.gesture != GestureKind::Idle && refined.gesture == self.last_gesture {
            self.sustain_frames = self.sustain_frames.saturating_add(1);
        } else {
            self.sustain_frames = 0;
        }
        self.last_gesture = refined.gesture;

        let momentum_before = self.momentum;
        self.smoother
            .update(&mut self.momentum, &refined, self.frame_dt);

        let particle = self
            .particle_mapper
            .map(&refined, &self.momentum, self.sustain_frames);
        let color = self
            .color_mapper
            .resolve(&ColorRequest::from_gesture(refined.gesture));

        if !self.momentum.is_finite() || !particle.is_finite() || !color.is_finite() {
            tracing::warn!(
                room = %self.id,
                gesture = %refined.gesture,
                "non-finite pipeline output, retaining previous state"
            );
            self.momentum = momentum_before;
            return;
        }

        self.current.seq += 1;
        self.current.particle = particle;
        self.current.color = color;
    }

    async fn broadcast(&self) {
        let delivered = self.registry.broadcast(&self.current).await;
        tracing::debug!(
            room = %self.id,
            seq = self.current.seq,
            delivered,
            "state broadcast"
        );
    }
}
