//! # Silk-Agents
//!
//! Pluggable gesture-refinement layer for the Silkflow pipeline.
//!
//! The kinematic analyzer is authoritative; a refiner is an optional
//! post-processing stage that predicts user intent from recent history.
//! Capability (deterministic vs. model-enriched) is fixed at
//! construction time, so the pipeline never degrades silently.

pub mod agent;
pub mod capability;
pub mod refiner;

pub use agent::{AgentError, AgentResult};
pub use capability::{build_refiner, PipelineCapability};
pub use refiner::{GestureHistory, GestureRefiner, HeuristicRefiner, RefinerConfig};
