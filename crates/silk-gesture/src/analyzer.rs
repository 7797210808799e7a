//! Kinematic gesture classification.
//!
//! The analyzer is a pure function of (frame, previous frame): no clock,
//! no RNG, no retained state. Each gesture class receives a margin score
//! measuring how far the frame's geometry sits beyond that class's
//! decision boundary; the winner is the classification, the runner-up is
//! exposed as `prediction`, and confidence grows with the winning margin.

use serde::{Deserialize, Serialize};
use silk_core::{Error, GestureKind, GestureResult, LandmarkFrame, Result};

use crate::features;

/// Decision thresholds and scaling for the analyzer.
///
/// Distance thresholds are in normalized hand units, speeds in normalized
/// screen units per frame. Values follow the tuning of the tracking
/// frontend this service was built against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Thumb-to-index distance below which a pinch is detected
    pub pinch_threshold: f64,
    /// Hand openness below which a grab (fist) is detected
    pub grab_threshold: f64,
    /// Hand openness above which a spread (open palm) is detected
    pub spread_threshold: f64,
    /// Palm speed above which motion classifies as a swipe
    pub swipe_speed_threshold: f64,
    /// Finger extension above which a finger counts as extended
    pub extension_threshold: f64,
    /// Scale from palm displacement magnitude to intensity
    pub sensitivity: f64,
    /// Sigmoid steepness mapping the winning margin to confidence
    pub confidence_gain: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            grab_threshold: 0.15,
            spread_threshold: 0.25,
            swipe_speed_threshold: 0.03,
            extension_threshold: 0.15,
            sensitivity: 10.0,
            confidence_gain: 3.0,
        }
    }
}

/// Stateless gesture classifier
#[derive(Debug, Clone, Default)]
pub struct KinematicAnalyzer {
    config: AnalyzerConfig,
}

impl KinematicAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify one frame against the previous one.
    ///
    /// Identical inputs always produce identical outputs. Fails with
    /// `InvalidInput` when the frame carries no landmarks or a
    /// non-finite palm center.
    pub fn analyze(
        &self,
        frame: &LandmarkFrame,
        prev: Option<&LandmarkFrame>,
    ) -> Result<GestureResult> {
        if frame.landmarks.is_empty() {
            return Err(Error::InvalidInput("empty landmark frame".to_string()));
        }
        if !frame.palm_center.is_finite() {
            return Err(Error::InvalidInput(
                "palm center is missing or non-finite".to_string(),
            ));
        }

        let cfg = &self.config;

        let openness = features::hand_openness(frame);
        let pinch = features::pinch_distance(frame);
        let displacement = features::palm_displacement(frame, prev);
        let speed = displacement.magnitude();

        let mut scored = [
            (GestureKind::Pinch, margin_below(pinch, cfg.pinch_threshold)),
            (GestureKind::Grab, margin_below(openness, cfg.grab_threshold)),
            (
                GestureKind::Spread,
                margin_above(openness, cfg.spread_threshold),
            ),
            (
                GestureKind::Swipe,
                margin_above(speed, cfg.swipe_speed_threshold),
            ),
            (GestureKind::Point, self.point_margin(frame)),
            // Idle wins by default when nothing else crosses its boundary.
            (GestureKind::Idle, 0.05),
        ];

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let (gesture, winning_margin) = scored[0];
        let (prediction, _) = scored[1];

        let intensity = (speed * cfg.sensitivity).clamp(0.0, 1.0);
        let direction = displacement.normalized();

        // Unambiguous frames (large margin) approach full confidence;
        // partial skeletons are discounted by coverage.
        let confidence = sigmoid(cfg.confidence_gain * winning_margin) * frame.coverage();

        Ok(GestureResult::new(
            gesture,
            intensity,
            direction,
            confidence,
            prediction,
        ))
    }

    fn point_margin(&self, frame: &LandmarkFrame) -> f64 {
        if features::index_isolated(frame, self.config.extension_threshold) {
            margin_above(
                features::index_extension(frame),
                self.config.extension_threshold,
            )
        } else {
            -1.0
        }
    }
}

/// Normalized distance past an upper-bound boundary (positive = beyond).
fn margin_above(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return -1.0;
    }
    ((value - threshold) / threshold).min(4.0)
}

/// Normalized distance past a lower-bound boundary (positive = beyond).
fn margin_below(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return -1.0;
    }
    ((threshold - value) / threshold).min(4.0)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_core::{Landmark, Position2D};

    fn frame_with(landmarks: Vec<Landmark>) -> LandmarkFrame {
        LandmarkFrame {
            landmarks,
            palm_center: Landmark::new(0.5, 0.5, 0.0),
            current_pos: Position2D::new(0.5, 0.5),
            prev_pos: Position2D::new(0.5, 0.5),
        }
    }

    /// Build a hand from explicit fingertip positions (thumb..pinky),
    /// all finger bases at the palm.
    fn hand(tips: [(f64, f64); 5]) -> LandmarkFrame {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        for ((tip, base), (x, y)) in silk_core::HandLandmark::finger_segments()
            .iter()
            .zip(tips.iter())
        {
            landmarks[base.index()] = Landmark::new(0.5, 0.5, 0.0);
            landmarks[tip.index()] = Landmark::new(*x, *y, 0.0);
        }
        frame_with(landmarks)
    }

    /// Curled fingers, thumb resting to the side: openness well below
    /// the grab threshold, thumb and index not pinching.
    fn fist_frame() -> LandmarkFrame {
        hand([
            (0.44, 0.54),
            (0.49, 0.515),
            (0.505, 0.515),
            (0.515, 0.51),
            (0.52, 0.505),
        ])
    }

    /// Fingers fanned wide: openness well above the spread threshold.
    fn open_frame() -> LandmarkFrame {
        hand([
            (0.25, 0.35),
            (0.40, 0.15),
            (0.50, 0.10),
            (0.65, 0.15),
            (0.75, 0.35),
        ])
    }

    /// Half-open relaxed hand: no static gesture triggers.
    fn neutral_frame() -> LandmarkFrame {
        hand([
            (0.36, 0.56),
            (0.42, 0.32),
            (0.50, 0.32),
            (0.58, 0.32),
            (0.64, 0.56),
        ])
    }

    #[test]
    fn test_empty_frame_rejected() {
        let analyzer = KinematicAnalyzer::default();
        let frame = frame_with(Vec::new());
        let err = analyzer.analyze(&frame, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_palm_rejected() {
        let analyzer = KinematicAnalyzer::default();
        let mut frame = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);
        frame.palm_center = Landmark::new(f64::NAN, 0.5, 0.0);
        let err = analyzer.analyze(&frame, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_deterministic() {
        let analyzer = KinematicAnalyzer::default();
        let frame = open_frame();
        let a = analyzer.analyze(&frame, None).unwrap();
        let b = analyzer.analyze(&frame, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fist_classifies_as_grab() {
        let analyzer = KinematicAnalyzer::default();
        let result = analyzer.analyze(&fist_frame(), None).unwrap();
        assert_eq!(result.gesture, GestureKind::Grab);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_open_palm_classifies_as_spread() {
        let analyzer = KinematicAnalyzer::default();
        let result = analyzer.analyze(&open_frame(), None).unwrap();
        assert_eq!(result.gesture, GestureKind::Spread);
    }

    #[test]
    fn test_fast_motion_classifies_as_swipe() {
        let analyzer = KinematicAnalyzer::default();
        // Neutral half-open hand moving fast to the right.
        let mut frame = neutral_frame();
        frame.palm_center = Landmark::new(0.6, 0.5, 0.0);
        let mut prev = neutral_frame();
        prev.palm_center = Landmark::new(0.5, 0.5, 0.0);

        let result = analyzer.analyze(&frame, Some(&prev)).unwrap();
        assert_eq!(result.gesture, GestureKind::Swipe);
        assert!(result.intensity > 0.9, "large displacement saturates intensity");
        assert!((result.direction.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_detection() {
        let analyzer = KinematicAnalyzer::default();
        // Thumb and index tips touching, other fingers extended.
        let frame = hand([
            (0.50, 0.50),
            (0.52, 0.51),
            (0.50, 0.20),
            (0.60, 0.25),
            (0.70, 0.40),
        ]);
        let result = analyzer.analyze(&frame, None).unwrap();
        assert_eq!(result.gesture, GestureKind::Pinch);
    }

    #[test]
    fn test_still_neutral_hand_is_idle() {
        let analyzer = KinematicAnalyzer::default();
        let frame = neutral_frame();
        let result = analyzer.analyze(&frame, Some(&frame.clone())).unwrap();
        assert_eq!(result.gesture, GestureKind::Idle);
        assert_eq!(result.intensity, 0.0);
    }

    #[test]
    fn test_intensity_clamped() {
        let analyzer = KinematicAnalyzer::default();
        let mut frame = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);
        frame.palm_center = Landmark::new(100.0, 0.5, 0.0);
        let mut prev = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);
        prev.palm_center = Landmark::new(0.5, 0.5, 0.0);

        let result = analyzer.analyze(&frame, Some(&prev)).unwrap();
        assert_eq!(result.intensity, 1.0);
    }

    #[test]
    fn test_prediction_is_runner_up() {
        let analyzer = KinematicAnalyzer::default();
        let result = analyzer.analyze(&fist_frame(), None).unwrap();
        // A fist is also close to a pinch (thumb near index); either way
        // the prediction must differ from the winner.
        assert_ne!(result.prediction, result.gesture);
    }
}
