//! Fundamental types for the Silkflow gesture pipeline.

use chrono::Utc;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a viewer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for a room, the unit of shared visual state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self("main".to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }
}

/// A tracked point on the hand in normalized camera space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// 2D position in normalized screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Planar direction vector driving particle flow
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Direction2D {
    pub x: f64,
    pub y: f64,
}

impl Direction2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero when degenerate.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < 1e-9 {
            Self::zero()
        } else {
            Self::new(self.x / mag, self.y / mag)
        }
    }

    pub fn to_nalgebra(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// 3D vector for momentum and angular velocity state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn to_nalgebra(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// MediaPipe hand skeleton landmark indices (21 points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const COUNT: usize = 21;

    /// Fingertip/base pairs used to measure finger extension,
    /// thumb through pinky.
    pub fn finger_segments() -> &'static [(HandLandmark, HandLandmark)] {
        &[
            (HandLandmark::ThumbTip, HandLandmark::ThumbMcp),
            (HandLandmark::IndexTip, HandLandmark::IndexMcp),
            (HandLandmark::MiddleTip, HandLandmark::MiddleMcp),
            (HandLandmark::RingTip, HandLandmark::RingMcp),
            (HandLandmark::PinkyTip, HandLandmark::PinkyMcp),
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One frame of hand-tracking input
///
/// `landmarks` follows the MediaPipe 21-point hand skeleton.
/// `current_pos`/`prev_pos` carry the tracker's own palm path so a frame
/// is analyzable even when the previous frame was dropped upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub landmarks: Vec<Landmark>,
    pub palm_center: Landmark,
    pub current_pos: Position2D,
    pub prev_pos: Position2D,
}

impl LandmarkFrame {
    /// Landmark at a skeleton position, when the frame carries it.
    pub fn landmark(&self, which: HandLandmark) -> Option<&Landmark> {
        self.landmarks.get(which.index())
    }

    /// Fraction of the expected skeleton present in this frame, capped at 1.
    pub fn coverage(&self) -> f64 {
        (self.landmarks.len() as f64 / HandLandmark::COUNT as f64).min(1.0)
    }
}

/// Discrete classified hand gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Idle,
    Point,
    Pinch,
    Swipe,
    Grab,
    Spread,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Idle => "idle",
            GestureKind::Point => "point",
            GestureKind::Pinch => "pinch",
            GestureKind::Swipe => "swipe",
            GestureKind::Grab => "grab",
            GestureKind::Spread => "spread",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified output of the kinematic analyzer, produced fresh per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    pub gesture: GestureKind,
    pub intensity: f64,
    pub direction: Direction2D,
    pub confidence: f64,
    /// Second-most-likely class under the same scoring, exposed for
    /// downstream anticipatory smoothing.
    pub prediction: GestureKind,
}

impl GestureResult {
    pub fn new(
        gesture: GestureKind,
        intensity: f64,
        direction: Direction2D,
        confidence: f64,
        prediction: GestureKind,
    ) -> Self {
        Self {
            gesture,
            intensity: intensity.clamp(0.0, 1.0),
            direction,
            confidence: confidence.clamp(0.0, 1.0),
            prediction,
        }
    }

    pub fn idle() -> Self {
        Self::new(
            GestureKind::Idle,
            0.0,
            Direction2D::zero(),
            1.0,
            GestureKind::Idle,
        )
    }
}

/// Smoothed motion state carried across frames, owned by one room pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentumState {
    pub momentum: Vector3D,
    pub angular_velocity: Vector3D,
}

impl MomentumState {
    pub fn zero() -> Self {
        Self {
            momentum: Vector3D::zero(),
            angular_velocity: Vector3D::zero(),
        }
    }

    /// Combined norm of both vectors, used by decay tests and NaN guards.
    pub fn norm(&self) -> f64 {
        self.momentum.magnitude() + self.angular_velocity.magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.momentum.is_finite() && self.angular_velocity.is_finite()
    }
}

/// Particle-system parameters, replaced wholesale each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleParams {
    pub direction: Direction2D,
    pub expansion: f64,
    pub focus: f64,
    pub warp_speed: f64,
    pub momentum: Vector3D,
    pub angular_velocity: Vector3D,
}

impl ParticleParams {
    /// Rest pose the system relaxes toward absent input.
    pub fn rest() -> Self {
        Self {
            direction: Direction2D::zero(),
            expansion: 1.0,
            focus: 0.0,
            warp_speed: 0.0,
            momentum: Vector3D::zero(),
            angular_velocity: Vector3D::zero(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.expansion.is_finite()
            && self.focus.is_finite()
            && self.warp_speed.is_finite()
            && self.direction.x.is_finite()
            && self.direction.y.is_finite()
            && self.momentum.is_finite()
            && self.angular_velocity.is_finite()
    }
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self::rest()
    }
}

/// Named color theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Cosmic,
    Ocean,
    Fire,
    Ice,
    Sunset,
}

/// Fixed hue/saturation/lightness defaults for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePreset {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl ColorTheme {
    /// Static preset table. Explicit hue requests override `hue` only;
    /// saturation and lightness always come from here.
    pub fn preset(&self) -> ThemePreset {
        match self {
            ColorTheme::Cosmic => ThemePreset { hue: 0.6, saturation: 0.8, lightness: 0.6 },
            ColorTheme::Ocean => ThemePreset { hue: 0.55, saturation: 0.9, lightness: 0.5 },
            ColorTheme::Fire => ThemePreset { hue: 0.05, saturation: 1.0, lightness: 0.6 },
            ColorTheme::Ice => ThemePreset { hue: 0.5, saturation: 0.7, lightness: 0.8 },
            ColorTheme::Sunset => ThemePreset { hue: 0.1, saturation: 0.9, lightness: 0.7 },
        }
    }

    /// Lenient lookup for wire input: unknown names resolve to `Cosmic`
    /// rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "cosmic" => ColorTheme::Cosmic,
            "ocean" => ColorTheme::Ocean,
            "fire" => ColorTheme::Fire,
            "ice" => ColorTheme::Ice,
            "sunset" => ColorTheme::Sunset,
            _ => ColorTheme::Cosmic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Cosmic => "cosmic",
            ColorTheme::Ocean => "ocean",
            ColorTheme::Fire => "fire",
            ColorTheme::Ice => "ice",
            ColorTheme::Sunset => "sunset",
        }
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        ColorTheme::Cosmic
    }
}

/// Color parameters derived from theme and gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorParams {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub theme: ColorTheme,
}

impl ColorParams {
    pub fn from_theme(theme: ColorTheme) -> Self {
        let preset = theme.preset();
        Self {
            hue: preset.hue,
            saturation: preset.saturation,
            lightness: preset.lightness,
            theme,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.hue.is_finite() && self.saturation.is_finite() && self.lightness.is_finite()
    }
}

impl Default for ColorParams {
    fn default() -> Self {
        Self::from_theme(ColorTheme::Cosmic)
    }
}

/// The broadcast unit: one room's complete visual state
///
/// `seq` increases by one per applied control frame, so viewers can assert
/// they observe the same totally ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub seq: u64,
    pub particle: ParticleParams,
    pub color: ColorParams,
}

impl VisualState {
    pub fn initial() -> Self {
        Self {
            seq: 0,
            particle: ParticleParams::rest(),
            color: ColorParams::default(),
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_distance() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_direction_normalized() {
        let d = Direction2D::new(3.0, 4.0).normalized();
        assert!((d.magnitude() - 1.0).abs() < 1e-10);
        assert_eq!(Direction2D::zero().normalized(), Direction2D::zero());
    }

    #[test]
    fn test_gesture_result_clamps() {
        let r = GestureResult::new(
            GestureKind::Swipe,
            4.2,
            Direction2D::new(1.0, 0.0),
            -0.5,
            GestureKind::Idle,
        );
        assert_eq!(r.intensity, 1.0);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn test_theme_fallback() {
        assert_eq!(ColorTheme::from_name("nonexistent"), ColorTheme::Cosmic);
        assert_eq!(ColorTheme::from_name("fire"), ColorTheme::Fire);
    }

    #[test]
    fn test_theme_preset_values() {
        let fire = ColorTheme::Fire.preset();
        assert_eq!(fire.hue, 0.05);
        assert_eq!(fire.saturation, 1.0);
        assert_eq!(fire.lightness, 0.6);
    }

    #[test]
    fn test_gesture_wire_names() {
        let json = serde_json::to_string(&GestureKind::Spread).unwrap();
        assert_eq!(json, "\"spread\"");
        let back: GestureKind = serde_json::from_str("\"pinch\"").unwrap();
        assert_eq!(back, GestureKind::Pinch);
    }

    #[test]
    fn test_frame_coverage() {
        let frame = LandmarkFrame {
            landmarks: vec![Landmark::new(0.0, 0.0, 0.0); 21],
            palm_center: Landmark::new(0.5, 0.5, 0.0),
            current_pos: Position2D::new(0.5, 0.5),
            prev_pos: Position2D::new(0.5, 0.5),
        };
        assert_eq!(frame.coverage(), 1.0);
        assert!(frame.landmark(HandLandmark::PinkyTip).is_some());
    }
}
