//! # Silk-Gesture
//!
//! Kinematic analysis for the Silkflow pipeline: classifies noisy
//! per-frame hand landmarks into gestures and smooths successive
//! results into momentum state for the particle mapper.
//!
//! ```text
//! LandmarkFrame ──► KinematicAnalyzer ──► GestureResult
//!                                              │
//!                     MomentumState ◄── MotionSmoother
//! ```

pub mod analyzer;
pub mod features;
pub mod smoother;

pub use analyzer::{AnalyzerConfig, KinematicAnalyzer};
pub use smoother::{MotionSmoother, SmootherConfig};
