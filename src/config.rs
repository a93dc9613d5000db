//! Viewer configuration.
//!
//! This module provides the typed configuration consumed by the engine at
//! construction. The surface mirrors the property names the host exposes
//! (camelCase in JSON) and accepts the legacy kebab-case spellings as
//! aliases, so older host configurations keep deserializing.
//!
//! The configuration is resolved once and is immutable for the lifetime of
//! an engine instance.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_SCALE;

/// How the host dispatcher selects its raw listeners.
///
/// The engine does not attach listeners itself; this value is carried for the
/// dispatcher that does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ListenerMode {
    /// Pick touch or mouse listeners based on the detected input device.
    #[serde(rename = "auto")]
    Auto,
    /// Attach both mouse and touch listeners unconditionally.
    #[default]
    #[serde(rename = "mouse and touch")]
    MouseAndTouch,
}

/// Upper zoom limit policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitZoom {
    /// A fixed maximum scale.
    Scale(f64),
    /// Limit zoom at the image's natural resolution: the maximum scale is the
    /// ratio of natural to displayed width, resolved once the image loads.
    OriginalImageSize,
}

impl LimitZoom {
    /// The fixed scale limit, if this policy is a fixed one.
    #[must_use]
    pub fn fixed_scale(&self) -> Option<f64> {
        match self {
            LimitZoom::Scale(value) => Some(*value),
            LimitZoom::OriginalImageSize => None,
        }
    }
}

impl Default for LimitZoom {
    fn default() -> Self {
        LimitZoom::OriginalImageSize
    }
}

/// Wire form: a number, or the keyword string "original image size".
#[derive(Deserialize)]
#[serde(untagged)]
enum LimitZoomRepr {
    Scale(f64),
    Keyword(String),
}

const ORIGINAL_IMAGE_SIZE_KEYWORD: &str = "original image size";

impl Serialize for LimitZoom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LimitZoom::Scale(value) => serializer.serialize_f64(*value),
            LimitZoom::OriginalImageSize => serializer.serialize_str(ORIGINAL_IMAGE_SIZE_KEYWORD),
        }
    }
}

impl<'de> Deserialize<'de> for LimitZoom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LimitZoomRepr::deserialize(deserializer)? {
            LimitZoomRepr::Scale(value) => Ok(LimitZoom::Scale(value)),
            LimitZoomRepr::Keyword(keyword) if keyword == ORIGINAL_IMAGE_SIZE_KEYWORD => {
                Ok(LimitZoom::OriginalImageSize)
            }
            LimitZoomRepr::Keyword(keyword) => Err(serde::de::Error::custom(format!(
                "unknown limitZoom keyword {keyword:?}, expected a number or {ORIGINAL_IMAGE_SIZE_KEYWORD:?}"
            ))),
        }
    }
}

/// Gesture engine configuration.
///
/// See the `Default` impl for the value each field takes when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomConfig {
    /// Duration of animated settles (alignment, programmatic zoom), in ms.
    #[serde(alias = "transition-duration")]
    pub transition_duration: u32,

    /// Whether double-tap zoom toggling is enabled.
    #[serde(alias = "double-tap")]
    pub double_tap: bool,

    /// Target scale of a double-tap from the identity transform.
    #[serde(alias = "double-tap-scale")]
    pub double_tap_scale: f64,

    /// Scale step of programmatic zoom controls; a programmatic point zoom
    /// targets `zoom_control_scale + 1`.
    pub zoom_control_scale: f64,

    /// Snap back to scale 1 when a pinch gesture ends.
    #[serde(alias = "auto-zoom-out")]
    pub auto_zoom_out: bool,

    /// Upper zoom limit policy.
    #[serde(alias = "limit-zoom")]
    pub limit_zoom: LimitZoom,

    /// Disable panning entirely.
    pub disable_pan: bool,

    /// Clamp panning so content edges never enter the viewport.
    pub limit_pan: bool,

    /// Scale threshold below which panning is inactive.
    pub min_pan_scale: f64,

    /// Lower scale bound for gesture-driven zoom out.
    pub min_scale: f64,

    /// Listener selection for the host dispatcher.
    pub listeners: ListenerMode,

    /// Whether wheel zoom is enabled.
    pub wheel: bool,

    /// Scale step per wheel tick.
    pub wheel_zoom_factor: f64,

    /// Value of the image element's `draggable` attribute while mounted.
    pub draggable_image: bool,

    /// Track the pinch center's drift and pan with it (simultaneous
    /// pinch + drag).
    pub draggable_on_pinch: bool,

    /// Recompute the image max-height from its aspect ratio on resize.
    pub auto_height: bool,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            transition_duration: 200,
            double_tap: true,
            double_tap_scale: 2.0,
            zoom_control_scale: 1.0,
            auto_zoom_out: false,
            limit_zoom: LimitZoom::default(),
            disable_pan: false,
            limit_pan: false,
            min_pan_scale: 1.0001,
            min_scale: 0.0,
            listeners: ListenerMode::default(),
            wheel: true,
            wheel_zoom_factor: 0.2,
            draggable_image: false,
            draggable_on_pinch: false,
            auto_height: false,
        }
    }
}

impl ZoomConfig {
    /// Deserialize a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check value ranges.
    ///
    /// The engine trusts a validated configuration and never re-checks these
    /// bounds at event time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn finite_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    message: format!("must be finite and non-negative, got {value}"),
                })
            }
        }

        finite_non_negative("doubleTapScale", self.double_tap_scale)?;
        finite_non_negative("zoomControlScale", self.zoom_control_scale)?;
        finite_non_negative("wheelZoomFactor", self.wheel_zoom_factor)?;
        finite_non_negative("minScale", self.min_scale)?;
        finite_non_negative("minPanScale", self.min_pan_scale)?;

        if self.double_tap_scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "doubleTapScale",
                message: format!("must be positive, got {}", self.double_tap_scale),
            });
        }

        if let LimitZoom::Scale(max_scale) = self.limit_zoom {
            if !max_scale.is_finite() || max_scale < 1.0 {
                return Err(ConfigError::InvalidValue {
                    field: "limitZoom",
                    message: format!("must be a finite scale >= 1, got {max_scale}"),
                });
            }
            if max_scale <= self.min_scale {
                return Err(ConfigError::InvalidValue {
                    field: "limitZoom",
                    message: format!(
                        "must exceed minScale ({} <= {})",
                        max_scale, self.min_scale
                    ),
                });
            }
        }

        Ok(())
    }

    /// The scale limit to use before any natural-image resolution has run.
    #[must_use]
    pub fn initial_max_scale(&self) -> f64 {
        self.limit_zoom.fixed_scale().unwrap_or(DEFAULT_MAX_SCALE)
    }
}

/// Errors produced when loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A value is outside its accepted range.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}
