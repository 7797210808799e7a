//! Gesture refinement behind a capability trait.
//!
//! The deterministic pipeline is complete without any refiner; a
//! refiner may only sharpen the `prediction` field and nudge
//! confidence, never rewrite what the kinematic analyzer classified.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use silk_core::{GestureKind, GestureResult};
use std::collections::VecDeque;

use crate::agent::AgentResult;

/// Rolling window of recently classified gestures for one room
#[derive(Debug, Clone)]
pub struct GestureHistory {
    entries: VecDeque<GestureKind>,
    capacity: usize,
}

impl GestureHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, gesture: GestureKind) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(gesture);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most recent gestures, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = GestureKind> + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).copied()
    }

    pub fn recent_all(&self, n: usize, gesture: GestureKind) -> bool {
        self.len() >= n && self.recent(n).all(|g| g == gesture)
    }

    pub fn recent_contains(&self, n: usize, gesture: GestureKind) -> bool {
        self.recent(n).any(|g| g == gesture)
    }
}

impl Default for GestureHistory {
    fn default() -> Self {
        Self::new(30)
    }
}

/// Post-classification refinement stage
///
/// Implementations must be deterministic unless explicitly constructed
/// as an enriched capability (see [`crate::capability`]).
#[async_trait]
pub trait GestureRefiner: Send + Sync {
    fn name(&self) -> &str;

    async fn refine(
        &self,
        result: GestureResult,
        history: &GestureHistory,
    ) -> AgentResult<GestureResult>;
}

/// Tuning for the deterministic history-pattern refiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinerConfig {
    /// Consecutive identical gestures that count as a sustained pattern
    pub pattern_window: usize,
    /// Confidence added when the history confirms the classification
    pub confidence_boost: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            pattern_window: 3,
            confidence_boost: 0.1,
        }
    }
}

/// Deterministic intent predictor over the gesture history.
///
/// Patterns mirror the product's observed usage: a run of swipes means
/// the user wants continuous flow, alternating pinch/spread means they
/// are resizing, a recent grab means they are about to stop motion.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRefiner {
    config: RefinerConfig,
}

impl HeuristicRefiner {
    pub fn new(config: RefinerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GestureRefiner for HeuristicRefiner {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn refine(
        &self,
        mut result: GestureResult,
        history: &GestureHistory,
    ) -> AgentResult<GestureResult> {
        let window = self.config.pattern_window;

        if history.recent_all(window, GestureKind::Swipe) {
            // Sustained flow: the next frame is very likely another swipe.
            result.prediction = GestureKind::Swipe;
            if result.gesture == GestureKind::Swipe {
                result.confidence = (result.confidence + self.config.confidence_boost).min(1.0);
            }
        } else if history.recent_contains(window, GestureKind::Pinch)
            && history.recent_contains(window, GestureKind::Spread)
        {
            // Resize intent: anticipate the complement of the current pose.
            result.prediction = match result.gesture {
                GestureKind::Pinch => GestureKind::Spread,
                _ => GestureKind::Pinch,
            };
        } else if history.recent_contains(window, GestureKind::Grab) {
            result.prediction = GestureKind::Grab;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_core::Direction2D;

    fn result(gesture: GestureKind) -> GestureResult {
        GestureResult::new(gesture, 0.5, Direction2D::new(1.0, 0.0), 0.6, GestureKind::Idle)
    }

    #[test]
    fn test_history_ring_buffer() {
        let mut history = GestureHistory::new(3);
        for g in [
            GestureKind::Idle,
            GestureKind::Swipe,
            GestureKind::Swipe,
            GestureKind::Swipe,
        ] {
            history.push(g);
        }
        assert_eq!(history.len(), 3);
        assert!(history.recent_all(3, GestureKind::Swipe));
    }

    #[tokio::test]
    async fn test_swipe_run_predicts_continued_flow() {
        let refiner = HeuristicRefiner::default();
        let mut history = GestureHistory::default();
        for _ in 0..3 {
            history.push(GestureKind::Swipe);
        }

        let refined = refiner.refine(result(GestureKind::Swipe), &history).await.unwrap();
        assert_eq!(refined.prediction, GestureKind::Swipe);
        assert!(refined.confidence > 0.6);
    }

    #[tokio::test]
    async fn test_pinch_spread_alternation_predicts_resize() {
        let refiner = HeuristicRefiner::default();
        let mut history = GestureHistory::default();
        history.push(GestureKind::Pinch);
        history.push(GestureKind::Spread);
        history.push(GestureKind::Pinch);

        let refined = refiner.refine(result(GestureKind::Pinch), &history).await.unwrap();
        assert_eq!(refined.prediction, GestureKind::Spread);
    }

    #[tokio::test]
    async fn test_refiner_never_rewrites_classification() {
        let refiner = HeuristicRefiner::default();
        let mut history = GestureHistory::default();
        for _ in 0..5 {
            history.push(GestureKind::Grab);
        }

        let input = result(GestureKind::Swipe);
        let refined = refiner.refine(input, &history).await.unwrap();
        assert_eq!(refined.gesture, input.gesture);
        assert_eq!(refined.intensity, input.intensity);
        assert_eq!(refined.direction, input.direction);
    }

    #[tokio::test]
    async fn test_empty_history_is_passthrough() {
        let refiner = HeuristicRefiner::default();
        let history = GestureHistory::default();
        let input = result(GestureKind::Idle);
        let refined = refiner.refine(input, &history).await.unwrap();
        assert_eq!(refined, input);
    }
}
