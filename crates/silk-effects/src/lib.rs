//! # Silk-Effects
//!
//! Deterministic mapping from classified gestures to visual-effect
//! parameters: particle-system coefficients and color state. Both
//! mappers are pure functions so the room pipeline stays the single
//! writer of shared state.

pub mod color;
pub mod particle;

pub use color::{ColorMapper, ColorRequest};
pub use particle::{ParticleConfig, ParticleMapper, SetPoint};
