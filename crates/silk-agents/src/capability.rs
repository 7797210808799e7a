//! Pipeline capability selection.
//!
//! The pipeline's enrichment level is chosen once, at construction.
//! A misconfigured enriched pipeline is a startup error, never a
//! runtime fallback discovered through exception handling.

use serde::{Deserialize, Serialize};
use silk_core::{Error, Result};
use std::sync::Arc;

use crate::refiner::{GestureRefiner, HeuristicRefiner, RefinerConfig};

/// How much reasoning the refinement stage is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineCapability {
    /// History-pattern heuristics only; fully deterministic
    Deterministic,
    /// An externally wired model-backed refiner
    LlmEnriched,
}

impl Default for PipelineCapability {
    fn default() -> Self {
        PipelineCapability::Deterministic
    }
}

/// Build the refiner for a capability.
///
/// `external` carries a model-backed refiner supplied by the embedder;
/// it is required for [`PipelineCapability::LlmEnriched`] and ignored
/// otherwise.
pub fn build_refiner(
    capability: PipelineCapability,
    external: Option<Arc<dyn GestureRefiner>>,
) -> Result<Arc<dyn GestureRefiner>> {
    match capability {
        PipelineCapability::Deterministic => {
            Ok(Arc::new(HeuristicRefiner::new(RefinerConfig::default())))
        }
        PipelineCapability::LlmEnriched => external.ok_or_else(|| {
            Error::Config(
                "llm-enriched capability requires a wired refiner; \
                 none was provided at construction"
                    .to_string(),
            )
        }),
    }
}
