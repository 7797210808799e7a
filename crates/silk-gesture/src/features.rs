//! Geometric feature extraction from a single landmark frame.
//!
//! All helpers are pure functions over the frame. A feature whose
//! landmarks are missing from the frame reads as zero, which downstream
//! classification treats conservatively (no gesture is inferred from
//! absent data).

use silk_core::{Direction2D, HandLandmark, LandmarkFrame};

/// Mean fingertip-to-base extension across the five fingers, in hand
/// units. Low values mean a closed fist, high values an open palm.
pub fn hand_openness(frame: &LandmarkFrame) -> f64 {
    let segments = HandLandmark::finger_segments();
    let mut sum = 0.0;
    let mut count = 0usize;

    for (tip, base) in segments {
        if let (Some(t), Some(b)) = (frame.landmark(*tip), frame.landmark(*base)) {
            sum += t.distance_to(b);
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 3D distance between thumb tip and index tip; small values indicate a
/// pinch.
pub fn pinch_distance(frame: &LandmarkFrame) -> f64 {
    match (
        frame.landmark(HandLandmark::ThumbTip),
        frame.landmark(HandLandmark::IndexTip),
    ) {
        (Some(thumb), Some(index)) => thumb.distance_to(index),
        // Missing fingertips read as "far apart": no pinch inferred.
        _ => f64::MAX,
    }
}

/// Extension of the index finger, tip to MCP.
pub fn index_extension(frame: &LandmarkFrame) -> f64 {
    match (
        frame.landmark(HandLandmark::IndexTip),
        frame.landmark(HandLandmark::IndexMcp),
    ) {
        (Some(tip), Some(mcp)) => tip.distance_to(mcp),
        _ => 0.0,
    }
}

/// True when the index finger is extended while at most one other finger
/// is, the classic pointing pose.
pub fn index_isolated(frame: &LandmarkFrame, extension_threshold: f64) -> bool {
    if index_extension(frame) <= extension_threshold {
        return false;
    }

    let others = [
        (HandLandmark::MiddleTip, HandLandmark::MiddleMcp),
        (HandLandmark::RingTip, HandLandmark::RingMcp),
        (HandLandmark::PinkyTip, HandLandmark::PinkyMcp),
    ];

    let extended = others
        .iter()
        .filter(|(tip, base)| match (frame.landmark(*tip), frame.landmark(*base)) {
            (Some(t), Some(b)) => t.distance_to(b) > extension_threshold,
            _ => false,
        })
        .count();

    extended <= 1
}

/// Planar palm displacement between the previous and current frame.
///
/// Prefers the palm center of an explicit previous frame; falls back to
/// the tracker-supplied current/prev positions carried in the frame
/// itself. Y is flipped from screen space into effect space.
pub fn palm_displacement(frame: &LandmarkFrame, prev: Option<&LandmarkFrame>) -> Direction2D {
    let (dx, dy) = match prev {
        Some(p) => (
            frame.palm_center.x - p.palm_center.x,
            frame.palm_center.y - p.palm_center.y,
        ),
        None => (
            frame.current_pos.x - frame.prev_pos.x,
            frame.current_pos.y - frame.prev_pos.y,
        ),
    };

    Direction2D::new(dx, -dy)
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

    /// A flat open hand: fingertips far from their bases.
    fn open_hand() -> LandmarkFrame {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        for (i, (tip, base)) in HandLandmark::finger_segments().iter().enumerate() {
            let spread = 0.1 + i as f64 * 0.05;
            landmarks[base.index()] = Landmark::new(0.5, 0.5, 0.0);
            landmarks[tip.index()] = Landmark::new(0.5 + spread, 0.5 - 0.3, 0.0);
        }
        frame_with(landmarks)
    }

    /// A closed fist: fingertips curled onto their bases.
    fn fist() -> LandmarkFrame {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        for (tip, base) in HandLandmark::finger_segments() {
            landmarks[base.index()] = Landmark::new(0.5, 0.5, 0.0);
            landmarks[tip.index()] = Landmark::new(0.52, 0.52, 0.0);
        }
        frame_with(landmarks)
    }

    #[test]
    fn test_openness_separates_fist_from_palm() {
        assert!(hand_openness(&open_hand()) > hand_openness(&fist()));
        assert!(hand_openness(&fist()) < 0.15);
        assert!(hand_openness(&open_hand()) > 0.25);
    }

    #[test]
    fn test_pinch_distance_missing_landmarks() {
        let frame = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 3]);
        assert_eq!(pinch_distance(&frame), f64::MAX);
    }

    #[test]
    fn test_displacement_prefers_previous_frame() {
        let mut current = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);
        current.palm_center = Landmark::new(0.6, 0.5, 0.0);
        let prev = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);

        let d = palm_displacement(&current, Some(&prev));
        assert!((d.x - 0.1).abs() < 1e-10);
        assert_eq!(d.y, 0.0);
    }

    #[test]
    fn test_displacement_falls_back_to_frame_path() {
        let mut frame = frame_with(vec![Landmark::new(0.5, 0.5, 0.0); 21]);
        frame.current_pos = Position2D::new(0.5, 0.6);
        frame.prev_pos = Position2D::new(0.5, 0.5);

        let d = palm_displacement(&frame, None);
        // Screen y grows downward; effect space flips it.
        assert!((d.y + 0.1).abs() < 1e-10);
    }
}
