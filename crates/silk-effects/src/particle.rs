//! Gesture-to-particle parameter mapping.
//!
//! ## Gesture Set Points
//!
//! | Gesture | Expansion | Focus | Effect |
//! |---------|-----------|-------|--------|
//! | Pinch | 0.5 | 1.0 | contract into a tight core |
//! | Grab | 0.6 | 0.9 | clench, motion already stopped upstream |
//! | Spread | 3.0 | 0.0 | bloom outward |
//! | others | 1.0 | 0.0 | rest pose |
//!
//! Set points are blended continuously by intensity rather than switched
//! discretely, so a gesture fading in or out never pops visually.

use serde::{Deserialize, Serialize};
use silk_core::{GestureKind, GestureResult, MomentumState, ParticleParams};

/// Expansion/focus target for one gesture class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetPoint {
    pub expansion: f64,
    pub focus: f64,
}

impl SetPoint {
    pub const REST: SetPoint = SetPoint {
        expansion: 1.0,
        focus: 0.0,
    };
}

/// Tuning for the particle mapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub pinch: SetPoint,
    pub grab: SetPoint,
    pub spread: SetPoint,
    /// Frames of one sustained non-idle gesture until warp saturates
    pub warp_sustain_frames: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            pinch: SetPoint {
                expansion: 0.5,
                focus: 1.0,
            },
            grab: SetPoint {
                expansion: 0.6,
                focus: 0.9,
            },
            spread: SetPoint {
                expansion: 3.0,
                focus: 0.0,
            },
            warp_sustain_frames: 120,
        }
    }
}

/// Deterministic gesture-to-particle mapper, no I/O and no retained state
#[derive(Debug, Clone, Default)]
pub struct ParticleMapper {
    config: ParticleConfig,
}

impl ParticleMapper {
    pub fn new(config: ParticleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Map one gesture result plus the room's smoothed momentum into a
    /// complete parameter set.
    ///
    /// `sustain_frames` counts consecutive frames of the same non-idle
    /// gesture; it drives warp speed and is tracked by the caller.
    /// Out-of-range intensity is clamped, not rejected.
    pub fn map(
        &self,
        result: &GestureResult,
        momentum: &MomentumState,
        sustain_frames: u32,
    ) -> ParticleParams {
        let intensity = result.intensity.clamp(0.0, 1.0);
        let target = self.set_point(result.gesture);

        let expansion = lerp(SetPoint::REST.expansion, target.expansion, intensity);
        let focus = lerp(SetPoint::REST.focus, target.focus, intensity);

        let warp_speed = if result.gesture == GestureKind::Idle {
            0.0
        } else {
            let sustain = (sustain_frames as f64 / self.config.warp_sustain_frames as f64).min(1.0);
            intensity * sustain
        };

        ParticleParams {
            direction: result.direction.normalized(),
            expansion,
            focus,
            warp_speed,
            momentum: momentum.momentum,
            angular_velocity: momentum.angular_velocity,
        }
    }

    fn set_point(&self, gesture: GestureKind) -> SetPoint {
        match gesture {
            GestureKind::Pinch => self.config.pinch,
            GestureKind::Grab => self.config.grab,
            GestureKind::Spread => self.config.spread,
            GestureKind::Idle | GestureKind::Point | GestureKind::Swipe => SetPoint::REST,
        }
    }
}

fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor
}
