//! Momentum and angular-velocity smoothing across frames.
//!
//! The smoother is the only writer of a room's `MomentumState`. Each
//! update applies exponential decay first and an additive gesture
//! contribution second, so bounded inputs stay bounded over unbounded
//! time: with decay d in (0,1) and gain g, the steady-state norm can
//! never exceed g / (1 - d).

use serde::{Deserialize, Serialize};
use silk_core::{GestureKind, GestureResult, MomentumState};

/// Decay and gain constants for the motion smoother.
///
/// Decay factors are per reference frame (1/60 s) and are raised to the
/// elapsed-frame count, so behavior is frame-rate independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Per-frame momentum retention, strictly inside (0, 1)
    pub momentum_decay: f64,
    /// Per-frame angular-velocity retention, strictly inside (0, 1)
    pub angular_decay: f64,
    /// Gain from intensity-weighted direction into momentum
    pub momentum_gain: f64,
    /// Gain from intensity-weighted direction into angular velocity
    pub angular_gain: f64,
    /// Frame rate the decay constants are expressed against
    pub reference_hz: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            momentum_decay: 0.98,
            angular_decay: 0.97,
            momentum_gain: 0.5,
            angular_gain: 0.3,
            reference_hz: 60.0,
        }
    }
}

impl SmootherConfig {
    /// Clamp decay factors into the open interval that guarantees
    /// stability.
    pub fn validated(mut self) -> Self {
        self.momentum_decay = self.momentum_decay.clamp(1e-6, 1.0 - 1e-6);
        self.angular_decay = self.angular_decay.clamp(1e-6, 1.0 - 1e-6);
        self
    }
}

/// Stateful per-room motion filter
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    config: SmootherConfig,
}

impl MotionSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Fold one analyzer result into the momentum state.
    ///
    /// Decay is applied before the additive update. Directional gestures
    /// (swipe, point) inject momentum and a perpendicular swirl into
    /// angular velocity; a grab stops all motion immediately; everything
    /// else only decays.
    pub fn update(&self, state: &mut MomentumState, result: &GestureResult, dt: f64) {
        let frames = (dt * self.config.reference_hz).max(0.0);
        let momentum_factor = self.config.momentum_decay.powf(frames);
        let angular_factor = self.config.angular_decay.powf(frames);

        state.momentum = state.momentum.scale(momentum_factor);
        state.angular_velocity = state.angular_velocity.scale(angular_factor);

        match result.gesture {
            GestureKind::Grab => {
                *state = MomentumState::zero();
            }
            GestureKind::Swipe | GestureKind::Point => {
                let push = result.intensity * self.config.momentum_gain;
                state.momentum.x += result.direction.x * push;
                state.momentum.y += result.direction.y * push;

                let swirl = result.intensity * self.config.angular_gain;
                state.angular_velocity.y += result.direction.x * swirl;
                state.angular_velocity.x -= result.direction.y * swirl;
            }
            GestureKind::Idle | GestureKind::Pinch | GestureKind::Spread => {}
        }
    }

    /// Upper bound on the steady-state momentum magnitude under
    /// sustained maximum input at the reference frame rate.
    pub fn steady_state_bound(&self) -> f64 {
        self.config.momentum_gain / (1.0 - self.config.momentum_decay)
    }
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}
