//! Gesture-to-color mapping over a static theme table.
//!
//! Resolution precedence: explicit theme > gesture-implied theme >
//! default "cosmic". An explicit hue overrides the preset's hue only;
//! saturation and lightness always come from the table. Unknown theme
//! names fall back to cosmic rather than failing.

use serde::{Deserialize, Serialize};
use silk_core::{ColorParams, ColorTheme, GestureKind};

/// A color-change request from the control plane
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture: Option<GestureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
}

impl ColorRequest {
    pub fn from_gesture(gesture: GestureKind) -> Self {
        Self {
            gesture: Some(gesture),
            theme: None,
            hue: None,
        }
    }
}

/// Deterministic color resolver
#[derive(Debug, Clone, Default)]
pub struct ColorMapper;

impl ColorMapper {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a request into concrete color parameters.
    pub fn resolve(&self, request: &ColorRequest) -> ColorParams {
        let explicit_theme = request.theme.as_deref().map(ColorTheme::from_name);

        let theme = explicit_theme
            .or_else(|| request.gesture.map(Self::implied_theme))
            .unwrap_or_default();

        let mut params = ColorParams::from_theme(theme);

        // Gesture hue accents apply only when the theme was implied, so
        // an explicit theme request reproduces its preset exactly.
        if explicit_theme.is_none() {
            if let Some(gesture) = request.gesture {
                if let Some(hue) = Self::gesture_hue(gesture) {
                    params.hue = hue;
                }
            }
        }

        if let Some(hue) = request.hue {
            params.hue = hue.clamp(0.0, 1.0);
        }

        params
    }

    /// Theme suggested by a gesture when none was requested.
    fn implied_theme(gesture: GestureKind) -> ColorTheme {
        match gesture {
            GestureKind::Spread => ColorTheme::Ocean,
            GestureKind::Grab => ColorTheme::Fire,
            GestureKind::Point => ColorTheme::Ice,
            GestureKind::Swipe | GestureKind::Pinch | GestureKind::Idle => ColorTheme::Cosmic,
        }
    }

    /// Hue accent layered on an implied theme.
    fn gesture_hue(gesture: GestureKind) -> Option<f64> {
        match gesture {
            GestureKind::Swipe => Some(0.75),
            GestureKind::Pinch => Some(0.3),
            GestureKind::Spread => Some(0.55),
            GestureKind::Grab => Some(0.15),
            GestureKind::Point | GestureKind::Idle => None,
        }
    }
}
