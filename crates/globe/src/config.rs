use std::path::Path;

use field::{FieldConfig, StarConfig};
use foundation::math::{ScreenDisc, Viewport};
use runtime::FrameClockConfig;
use scene::{BalloonConfig, RotationConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read failed: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse failed: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the globe sits in the viewport, as fractions of the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center_x_frac: f64,
    pub center_y_frac: f64,
    /// Fraction of the shorter viewport side.
    pub radius_frac: f64,
    pub radius_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x_frac: 0.5,
            center_y_frac: 0.60,
            radius_frac: 0.40,
            radius_scale: 0.9,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Cumulative pointer travel, in pixels, at which a press becomes a drag.
    pub click_slop_px: f64,
    /// Picks must be strictly closer than this.
    pub pick_radius_px: f64,
    /// The globe hit circle is `dist² <= R² * hit_slack`.
    pub hit_slack: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_slop_px: 3.0,
            pick_radius_px: 22.0,
            hit_slack: 1.05,
        }
    }
}

/// Slow sinusoidal drift applied to the background layers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub amplitude_x: f64,
    pub amplitude_y: f64,
    /// Radians per ms.
    pub freq_x: f64,
    pub freq_y: f64,
    pub star_factor: f64,
    pub field_factor: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            amplitude_x: 8.0,
            amplitude_y: 6.0,
            freq_x: 1e-5,
            freq_y: 8e-6,
            star_factor: 0.3,
            field_factor: 0.7,
        }
    }
}

impl ParallaxConfig {
    /// Base drift at `now_ms`, before the per-layer factor.
    pub fn drift(&self, now_ms: f64) -> (f64, f64) {
        (
            (now_ms * self.freq_x).sin() * self.amplitude_x,
            (now_ms * self.freq_y).cos() * self.amplitude_y,
        )
    }
}

/// Finest graticule sampling accepted; each line holds `360 / step` points.
pub const MIN_GRATICULE_STEP_DEG: f64 = 0.1;

/// Inset plot of pseudo (u, v) baseline samples, drawn as spokes from its
/// centre.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvOverlayConfig {
    pub samples: usize,
    pub center_x_frac: f64,
    pub center_y_frac: f64,
    /// Fraction of the shorter viewport side.
    pub radius_frac: f64,
}

impl Default for UvOverlayConfig {
    fn default() -> Self {
        Self {
            samples: 240,
            center_x_frac: 0.86,
            center_y_frac: 0.18,
            radius_frac: 0.12,
        }
    }
}

impl UvOverlayConfig {
    pub fn disc(&self, viewport: Viewport) -> ScreenDisc {
        ScreenDisc::new(
            viewport.at_fraction(self.center_x_frac, self.center_y_frac),
            viewport.min_side() * self.radius_frac,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub layout: LayoutConfig,
    pub rotation: RotationConfig,
    pub input: InputConfig,
    pub clock: FrameClockConfig,
    pub parallax: ParallaxConfig,
    pub graticule_step_deg: f64,
    pub stars: StarConfig,
    pub field: FieldConfig,
    /// Draws baselines between linked stations.
    pub network: bool,
    pub balloon: Option<BalloonConfig>,
    pub uv_overlay: Option<UvOverlayConfig>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            rotation: RotationConfig::default(),
            input: InputConfig::default(),
            clock: FrameClockConfig::default(),
            parallax: ParallaxConfig::default(),
            graticule_step_deg: 6.0,
            stars: StarConfig::default(),
            field: FieldConfig::default(),
            network: true,
            balloon: None,
            uv_overlay: None,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {v}"
                )))
            }
        };

        positive("layout.radius_frac", self.layout.radius_frac)?;
        positive("layout.radius_scale", self.layout.radius_scale)?;
        if !(self.graticule_step_deg >= MIN_GRATICULE_STEP_DEG) {
            return Err(ConfigError::Invalid(format!(
                "graticule_step_deg must be at least {MIN_GRATICULE_STEP_DEG}, got {}",
                self.graticule_step_deg
            )));
        }
        positive("input.hit_slack", self.input.hit_slack)?;
        non_negative("input.click_slop_px", self.input.click_slop_px)?;
        non_negative("input.pick_radius_px", self.input.pick_radius_px)?;
        non_negative("clock.min_dt_ms", self.clock.min_dt_ms)?;
        if !(self.clock.min_dt_ms <= self.clock.max_dt_ms) {
            return Err(ConfigError::Invalid(format!(
                "clock.min_dt_ms ({}) exceeds clock.max_dt_ms ({})",
                self.clock.min_dt_ms, self.clock.max_dt_ms
            )));
        }
        non_negative("rotation.pitch_margin", self.rotation.pitch_margin)?;
        if let Some(uv) = &self.uv_overlay {
            positive("uv_overlay.radius_frac", uv.radius_frac)?;
        }
        if self.field.candidates_per_slot == 0 {
            return Err(ConfigError::Invalid(
                "field.candidates_per_slot must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
